//! Deal, module, and executor result types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A negotiated unit of work.
///
/// Only `id` matters to the executor: it namespaces the local results
/// directory and tags every error. The party fields are carried for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_provider: Option<String>,
}

impl Deal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            job_creator: None,
            resource_provider: None,
        }
    }
}

/// A job specification, submitted to the backend verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub job: serde_json::Value,
}

/// Backend-assigned handle for a submitted job.
///
/// Deserializing goes through [`JobId::parse`], so a decoded id is never
/// blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Build a job id from raw backend output.
    ///
    /// Surrounding whitespace is stripped; `None` if nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = &'static str;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or("job id must not be empty")
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of one successful job run, handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorResults {
    /// Local directory the published artifacts were copied into.
    pub results_dir: PathBuf,
    /// Content identifier of the published result set.
    pub results_cid: String,
    /// Units of work billed for the run. Always 1: no metering is done.
    pub instruction_count: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
