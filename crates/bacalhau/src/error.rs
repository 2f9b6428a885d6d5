//! Errors raised while running a deal's job on the backend.
//!
//! Every variant names the deal it belongs to, and job-level variants also
//! carry the job id, so a failure can be attributed from the message alone.

use dealexec_core::error::CoreError;
use dealexec_core::types::JobId;

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    // ---- channel errors ----
    #[error("error starting backend command for deal {deal_id}: {source}")]
    Spawn {
        deal_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error getting stdin pipe for deal {deal_id}")]
    StdinUnavailable { deal_id: String },

    #[error("error getting stdout pipe for deal {deal_id}")]
    StdoutUnavailable { deal_id: String },

    // ---- write / serialize errors ----
    #[error("error getting job JSON for deal {deal_id}: {source}")]
    Serialize {
        deal_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("error writing job JSON for deal {deal_id}: {source}")]
    WriteJob {
        deal_id: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error reading stdout bytes from create job for deal {deal_id}: {source}")]
    ReadOutput {
        deal_id: String,
        #[source]
        source: std::io::Error,
    },

    // ---- exit errors ----
    #[error("error waiting for job to complete for deal {deal_id}: {reason}")]
    Wait { deal_id: String, reason: String },

    #[error("error copying results for deal {deal_id}: {reason}")]
    Fetch { deal_id: String, reason: String },

    #[error("error calling describe command for deal {deal_id}: {reason}")]
    Describe { deal_id: String, reason: String },

    // ---- parse errors ----
    #[error("error unmarshalling job JSON for deal {deal_id}: {source}")]
    ParseJobState {
        deal_id: String,
        #[source]
        source: serde_json::Error,
    },

    // ---- domain errors ----
    #[error("backend returned an empty job id for deal {deal_id}")]
    EmptyJobId { deal_id: String },

    #[error("no executions found for job {job_id} (deal {deal_id})")]
    NoExecutions { deal_id: String, job_id: JobId },

    #[error("job {job_id} did not complete successfully: {state} (deal {deal_id})")]
    NotCompleted {
        deal_id: String,
        job_id: JobId,
        state: String,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> JobId {
        JobId::parse(id).expect("non-empty job id")
    }

    #[test]
    fn display_no_executions() {
        let err = ExecutorError::NoExecutions {
            deal_id: "deal-42".into(),
            job_id: job("job-99"),
        };
        assert_eq!(
            err.to_string(),
            "no executions found for job job-99 (deal deal-42)"
        );
    }

    #[test]
    fn display_not_completed() {
        let err = ExecutorError::NotCompleted {
            deal_id: "deal-42".into(),
            job_id: job("job-99"),
            state: "Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "job job-99 did not complete successfully: Error (deal deal-42)"
        );
    }

    #[test]
    fn display_wait_names_deal() {
        let err = ExecutorError::Wait {
            deal_id: "deal-7".into(),
            reason: "exit code 1: boom".into(),
        };
        assert!(err.to_string().contains("deal-7"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn io_variants_expose_source() {
        let err = ExecutorError::WriteJob {
            deal_id: "deal-1".into(),
            source: std::io::Error::other("broken pipe"),
        };
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn core_errors_pass_through() {
        let err: ExecutorError = CoreError::Validation("bad deal id".into()).into();
        assert_eq!(err.to_string(), "Validation failed: bad deal id");
    }
}
