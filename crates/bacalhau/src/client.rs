//! The three backend operations the executor depends on.

use std::path::Path;

use async_trait::async_trait;
use dealexec_core::types::{JobId, Module};

use crate::error::ExecutorError;
use crate::job::JobWithInfo;

/// Capability to run jobs on an execution backend.
///
/// Every call blocks until the backend answers; the backend itself does the
/// waiting, so implementations carry no polling or retry logic. `deal_id`
/// is passed through for error attribution only.
#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Submit `module`'s job and wait for the backend to accept it.
    async fn submit(&self, deal_id: &str, module: &Module) -> Result<JobId, ExecutorError>;

    /// Copy the job's published artifacts into `output_dir`, which must
    /// already exist.
    async fn fetch(
        &self,
        deal_id: &str,
        job_id: &JobId,
        output_dir: &Path,
    ) -> Result<(), ExecutorError>;

    /// Full status report for the job.
    async fn describe(&self, deal_id: &str, job_id: &JobId)
        -> Result<JobWithInfo, ExecutorError>;
}
