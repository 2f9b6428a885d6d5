use std::path::PathBuf;

use dealexec_core::env;

/// Default API endpoint handed to the `bacalhau` CLI.
pub const DEFAULT_API_HOST: &str = "localhost";

/// Default name of the `bacalhau` executable (resolved via `PATH`).
pub const DEFAULT_BINARY: &str = "bacalhau";

/// Executor configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BacalhauConfig {
    /// API endpoint injected as `BACALHAU_API_HOST` into every CLI call.
    pub api_host: String,
    /// `bacalhau` executable to spawn.
    pub binary: PathBuf,
    /// Directory under which `bacalhau-results/<deal>` is created. Empty
    /// means the working directory.
    pub results_root: PathBuf,
}

impl Default for BacalhauConfig {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            binary: PathBuf::from(DEFAULT_BINARY),
            results_root: PathBuf::new(),
        }
    }
}

impl BacalhauConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var             | Default     |
    /// |---------------------|-------------|
    /// | `BACALHAU_API_HOST` | `localhost` |
    /// | `BACALHAU_BIN`      | `bacalhau`  |
    /// | `RESULTS_ROOT`      | (empty)     |
    pub fn from_env() -> Self {
        let api_host = env::option_string("BACALHAU_API_HOST", DEFAULT_API_HOST);
        let binary = PathBuf::from(env::option_string("BACALHAU_BIN", DEFAULT_BINARY));
        let results_root = PathBuf::from(env::option_string("RESULTS_ROOT", ""));

        Self {
            api_host,
            binary,
            results_root,
        }
    }
}
