//! Domain types and pure helpers shared by the deal executor crates.
//!
//! Holds the deal/module/result data model, the environment-backed option
//! resolver, and the per-deal results directory store. Nothing here talks
//! to the execution backend.

pub mod env;
pub mod error;
pub mod results;
pub mod types;
