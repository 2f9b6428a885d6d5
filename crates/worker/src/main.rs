//! `dealexec-worker` -- runs one deal's job on Bacalhau.
//!
//! Reads a JSON job request (`{"deal": {...}, "module": {...}}`) from
//! stdin, runs it through the Bacalhau executor, and prints the resulting
//! `ExecutorResults` as JSON on stdout.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default     | Description                          |
//! |---------------------|----------|-------------|--------------------------------------|
//! | `BACALHAU_API_HOST` | no       | `localhost` | API endpoint passed to the CLI       |
//! | `BACALHAU_BIN`      | no       | `bacalhau`  | CLI executable to spawn              |
//! | `RESULTS_ROOT`      | no       | (cwd)       | Parent of `bacalhau-results/`        |

use std::io::Read;

use anyhow::Context;
use dealexec_bacalhau::{BacalhauConfig, BacalhauExecutor, Executor};
use dealexec_core::types::{Deal, Module};
use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Deserialize)]
struct JobRequest {
    deal: Deal,
    module: Module,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the result document.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dealexec_worker=info,dealexec_bacalhau=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = BacalhauConfig::from_env();
    tracing::info!(
        api_host = %config.api_host,
        binary = %config.binary.display(),
        "Starting dealexec-worker",
    );

    let mut raw = String::new();
    std::io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read job request from stdin")?;
    let request: JobRequest =
        serde_json::from_str(&raw).context("job request is not valid JSON")?;

    let executor = BacalhauExecutor::from_config(&config);
    let results = executor
        .run_job(&request.deal, &request.module)
        .await
        .with_context(|| format!("job for deal {} failed", request.deal.id))?;

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
