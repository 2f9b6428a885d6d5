//! Per-deal local directories for fetched job artifacts.
//!
//! Layout is `<root>/bacalhau-results/<deal_id>`. Directories are created
//! on demand and never cleared, so re-running a deal writes into whatever
//! an earlier run left behind.

use std::path::PathBuf;

use crate::error::CoreError;

/// Top-level directory name under the store root.
pub const RESULTS_DIR: &str = "bacalhau-results";

/// A deal id becomes a single path segment under the results root, so it
/// must not be empty, a relative-path component, or contain a separator.
fn is_safe_deal_id(deal_id: &str) -> bool {
    !deal_id.is_empty()
        && deal_id != "."
        && deal_id != ".."
        && !deal_id.contains(['/', '\\', '\0'])
}

/// Reject deal ids that cannot name a directory inside the results root.
///
/// Callers run this before submitting anything so a bad id never leaves a
/// job behind on the backend.
pub fn validate_deal_id(deal_id: &str) -> Result<(), CoreError> {
    if is_safe_deal_id(deal_id) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid deal id '{deal_id}' for results directory"
        )))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// Store rooted at `root`. An empty root keeps paths relative to the
    /// working directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path for `deal_id`, without touching the filesystem.
    pub fn path_for(&self, deal_id: &str) -> PathBuf {
        self.root.join(RESULTS_DIR).join(deal_id)
    }

    /// Create the results directory for `deal_id` (and any missing parents)
    /// and return its path. Safe to call repeatedly.
    pub async fn ensure(&self, deal_id: &str) -> Result<PathBuf, CoreError> {
        validate_deal_id(deal_id)?;

        let dir = self.path_for(deal_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| CoreError::ResultsDir {
                deal_id: deal_id.to_string(),
                source,
            })?;

        tracing::debug!(deal_id, path = %dir.display(), "Results directory ready");
        Ok(dir)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn path_layout() {
        let store = ResultStore::new("");
        assert_eq!(
            store.path_for("deal-42"),
            PathBuf::from("bacalhau-results/deal-42")
        );
    }

    #[test]
    fn safe_deal_ids() {
        assert!(is_safe_deal_id("deal-42"));
        assert!(is_safe_deal_id("0xabc_def.v2"));
        assert!(is_safe_deal_id("deal:42"));
        assert!(is_safe_deal_id("deal 42"));
        assert!(is_safe_deal_id("déal-42"));
        assert!(is_safe_deal_id("..deal"));
        assert!(is_safe_deal_id(&"a".repeat(200)));
    }

    #[test]
    fn unsafe_deal_ids() {
        assert!(!is_safe_deal_id(""));
        assert!(!is_safe_deal_id("."));
        assert!(!is_safe_deal_id(".."));
        assert!(!is_safe_deal_id("../etc"));
        assert!(!is_safe_deal_id("a/b"));
        assert!(!is_safe_deal_id("a\\b"));
        assert!(!is_safe_deal_id("a\0b"));
    }

    #[test]
    fn validate_deal_id_names_the_id() {
        let err = validate_deal_id("a/b").expect_err("should fail");
        assert_matches!(&err, CoreError::Validation(msg) if msg.contains("'a/b'"));
        assert!(validate_deal_id("deal:42").is_ok());
    }

    #[tokio::test]
    async fn ensure_creates_nested_directory() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let store = ResultStore::new(tmp.path().join("data"));

        let dir = store.ensure("deal-42").await.expect("ensure");

        assert_eq!(dir, tmp.path().join("data/bacalhau-results/deal-42"));
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn ensure_is_idempotent_and_keeps_contents() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let store = ResultStore::new(tmp.path());

        let first = store.ensure("deal-42").await.expect("first ensure");
        std::fs::write(first.join("stdout"), "hello").expect("write artifact");
        let second = store.ensure("deal-42").await.expect("second ensure");

        assert_eq!(first, second);
        let kept = std::fs::read_to_string(second.join("stdout")).expect("read artifact");
        assert_eq!(kept, "hello");
    }

    #[tokio::test]
    async fn ensure_rejects_traversal() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let store = ResultStore::new(tmp.path());

        let result = store.ensure("../escape").await;
        assert_matches!(result, Err(CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn ensure_reports_io_failure_with_deal_id() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        // A regular file where the results root should be blocks creation.
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").expect("write blocker");
        let store = ResultStore::new(&blocker);

        let err = store.ensure("deal-42").await.expect_err("should fail");
        assert_matches!(&err, CoreError::ResultsDir { deal_id, .. } if deal_id == "deal-42");
        assert!(err.to_string().contains("deal-42"));
    }
}
