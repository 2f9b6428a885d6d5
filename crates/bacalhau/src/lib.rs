//! Bacalhau job execution for deals.
//!
//! Submits a deal's module to a Bacalhau network through the `bacalhau`
//! CLI, copies the published results into a per-deal local directory, and
//! checks the job's final state before reporting [`ExecutorResults`].
//!
//! [`ExecutorResults`]: dealexec_core::types::ExecutorResults

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod subprocess;

pub use cli::BacalhauCli;
pub use client::JobBackend;
pub use config::BacalhauConfig;
pub use error::ExecutorError;
pub use executor::{BacalhauExecutor, Executor};
