//! Job status document returned by `bacalhau describe`.
//!
//! Only the parts the executor reads are typed: the lifecycle state and the
//! per-execution published results. The job spec itself is kept as raw JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a job as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStateType {
    #[default]
    Undefined,
    New,
    InProgress,
    Queued,
    Cancelled,
    Error,
    Completed,
    /// A state string this crate does not know, kept verbatim.
    Unknown(String),
}

impl JobStateType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Undefined => "Undefined",
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::Queued => "Queued",
            Self::Cancelled => "Cancelled",
            Self::Error => "Error",
            Self::Completed => "Completed",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<String> for JobStateType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Undefined" => Self::Undefined,
            "New" => Self::New,
            "InProgress" => Self::InProgress,
            "Queued" => Self::Queued,
            "Cancelled" => Self::Cancelled,
            "Error" => Self::Error,
            "Completed" => Self::Completed,
            _ => Self::Unknown(raw),
        }
    }
}

impl From<JobStateType> for String {
    fn from(state: JobStateType) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for JobStateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an execution published its outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSpec {
    #[serde(rename = "StorageSource", default, skip_serializing_if = "Option::is_none")]
    pub storage_source: Option<String>,
    #[serde(rename = "CID", default)]
    pub cid: String,
}

/// One attempt at running the job on a compute node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    #[serde(rename = "NodeId", default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(rename = "State", default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(rename = "PublishedResults", default)]
    pub published_results: StorageSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobState {
    #[serde(rename = "JobID", default)]
    pub job_id: String,
    #[serde(rename = "State", default)]
    pub state: JobStateType,
    #[serde(rename = "Executions", default)]
    pub executions: Vec<ExecutionState>,
}

/// Top-level describe document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobWithInfo {
    #[serde(rename = "Job", default)]
    pub job: serde_json::Value,
    #[serde(rename = "State", default)]
    pub state: JobState,
}

impl JobWithInfo {
    /// Parse the raw backend output.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Published result reference of the first execution, if any.
    pub fn first_result_cid(&self) -> Option<&str> {
        self.state
            .executions
            .first()
            .map(|exec| exec.published_results.cid.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
