//! Runs a deal's module on the backend and turns the outcome into
//! [`ExecutorResults`].
//!
//! Pipeline: check the deal id, submit, ensure the local results directory,
//! fetch artifacts into it, describe, validate. Any step's failure is
//! returned as-is with no retry. A job that was submitted but failed later is left on the
//! backend; nothing is cancelled or cleaned up locally.

use std::sync::Arc;

use async_trait::async_trait;
use dealexec_core::results::{self, ResultStore};
use dealexec_core::types::{Deal, ExecutorResults, JobId, Module};

use crate::cli::BacalhauCli;
use crate::client::JobBackend;
use crate::config::BacalhauConfig;
use crate::error::ExecutorError;
use crate::job::JobWithInfo;

/// Instruction count reported for every run; results are not metered.
pub const INSTRUCTION_COUNT: u64 = 1;

/// Anything that can run a deal's module to completion.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn run_job(&self, deal: &Deal, module: &Module)
        -> Result<ExecutorResults, ExecutorError>;
}

pub struct BacalhauExecutor {
    backend: Arc<dyn JobBackend>,
    store: ResultStore,
}

impl BacalhauExecutor {
    pub fn new(backend: Arc<dyn JobBackend>, store: ResultStore) -> Self {
        Self { backend, store }
    }

    /// Executor that shells out to the `bacalhau` CLI described by `config`.
    pub fn from_config(config: &BacalhauConfig) -> Self {
        let cli = BacalhauCli::new(config.binary.clone(), config.api_host.clone());
        Self::new(Arc::new(cli), ResultStore::new(config.results_root.clone()))
    }
}

#[async_trait]
impl Executor for BacalhauExecutor {
    async fn run_job(
        &self,
        deal: &Deal,
        module: &Module,
    ) -> Result<ExecutorResults, ExecutorError> {
        let deal_id = deal.id.as_str();
        // Checked up front: once submitted, a job cannot be taken back.
        results::validate_deal_id(deal_id)?;

        tracing::info!(
            deal_id,
            job_creator = deal.job_creator.as_deref(),
            resource_provider = deal.resource_provider.as_deref(),
            "Running job for deal",
        );

        let job_id = self.backend.submit(deal_id, module).await?;

        let results_dir = self.store.ensure(deal_id).await?;
        self.backend.fetch(deal_id, &job_id, &results_dir).await?;

        let job = self.backend.describe(deal_id, &job_id).await?;
        let results_cid = validate_job(deal_id, &job_id, &job)?;

        tracing::info!(
            deal_id,
            job_id = %job_id,
            results_cid = %results_cid,
            results_dir = %results_dir.display(),
            "Job completed",
        );

        Ok(ExecutorResults {
            results_dir,
            results_cid,
            instruction_count: INSTRUCTION_COUNT,
        })
    }
}

/// Check that the job finished with at least one execution and return the
/// first execution's published result CID.
fn validate_job(
    deal_id: &str,
    job_id: &JobId,
    job: &JobWithInfo,
) -> Result<String, ExecutorError> {
    let Some(first) = job.state.executions.first() else {
        tracing::warn!(deal_id, job_id = %job_id, "No executions recorded for job");
        return Err(ExecutorError::NoExecutions {
            deal_id: deal_id.to_string(),
            job_id: job_id.clone(),
        });
    };

    if !job.state.state.is_completed() {
        tracing::warn!(
            deal_id,
            job_id = %job_id,
            state = %job.state.state,
            "Job did not complete",
        );
        return Err(ExecutorError::NotCompleted {
            deal_id: deal_id.to_string(),
            job_id: job_id.clone(),
            state: job.state.state.to_string(),
        });
    }

    Ok(first.published_results.cid.clone())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
