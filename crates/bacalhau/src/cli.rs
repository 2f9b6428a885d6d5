//! [`JobBackend`] backed by the `bacalhau` command-line client.
//!
//! Each operation spawns one `bacalhau` process. The child inherits this
//! process's environment with `BACALHAU_API_HOST` set from the config the
//! client was built with.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dealexec_core::types::{JobId, Module};
use tokio::process::Command;

use crate::client::JobBackend;
use crate::error::ExecutorError;
use crate::job::JobWithInfo;
use crate::subprocess;

/// Environment variable the CLI reads its API endpoint from.
pub const API_HOST_ENV: &str = "BACALHAU_API_HOST";

#[derive(Debug, Clone)]
pub struct BacalhauCli {
    binary: PathBuf,
    api_host: String,
}

impl BacalhauCli {
    /// * `binary` - Path or name of the `bacalhau` executable.
    /// * `api_host` - Value injected as `BACALHAU_API_HOST` on every call.
    pub fn new(binary: impl Into<PathBuf>, api_host: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            api_host: api_host.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.env(API_HOST_ENV, &self.api_host);
        cmd
    }
}

#[async_trait]
impl JobBackend for BacalhauCli {
    async fn submit(&self, deal_id: &str, module: &Module) -> Result<JobId, ExecutorError> {
        let input = serde_json::to_vec(&module.job).map_err(|source| ExecutorError::Serialize {
            deal_id: deal_id.to_string(),
            source,
        })?;

        let mut cmd = self.command();
        cmd.args(["create", "--id-only", "--wait", "-"]);

        tracing::info!(deal_id, api_host = %self.api_host, "Submitting job");
        let output = subprocess::run_with_input(&mut cmd, &input, deal_id).await?;

        let job_id = JobId::parse(&String::from_utf8_lossy(&output)).ok_or_else(|| {
            ExecutorError::EmptyJobId {
                deal_id: deal_id.to_string(),
            }
        })?;

        tracing::info!(deal_id, job_id = %job_id, "Job submitted");
        Ok(job_id)
    }

    async fn fetch(
        &self,
        deal_id: &str,
        job_id: &JobId,
        output_dir: &Path,
    ) -> Result<(), ExecutorError> {
        let mut cmd = self.command();
        cmd.arg("get")
            .arg(job_id.as_str())
            .arg("--output-dir")
            .arg(output_dir);

        let output = subprocess::run_combined(&mut cmd)
            .await
            .map_err(|e| ExecutorError::Fetch {
                deal_id: deal_id.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExecutorError::Fetch {
                deal_id: deal_id.to_string(),
                reason: output.failure_reason(),
            });
        }

        tracing::info!(
            deal_id,
            job_id = %job_id,
            output_dir = %output_dir.display(),
            "Job results copied",
        );
        Ok(())
    }

    async fn describe(
        &self,
        deal_id: &str,
        job_id: &JobId,
    ) -> Result<JobWithInfo, ExecutorError> {
        let mut cmd = self.command();
        cmd.arg("describe").arg(job_id.as_str());

        let output = subprocess::run_combined(&mut cmd)
            .await
            .map_err(|e| ExecutorError::Describe {
                deal_id: deal_id.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(ExecutorError::Describe {
                deal_id: deal_id.to_string(),
                reason: output.failure_reason(),
            });
        }

        let job = JobWithInfo::from_slice(&output.combined()).map_err(|source| {
            ExecutorError::ParseJobState {
                deal_id: deal_id.to_string(),
                source,
            }
        })?;

        tracing::debug!(deal_id, job_id = %job_id, state = %job.state.state, "Job described");
        Ok(job)
    }
}
