//! Shared subprocess plumbing for the backend CLI.
//!
//! [`run_with_input`] pipes a payload to the child's stdin and collects its
//! stdout; [`run_combined`] runs a child with no input and returns stdout
//! followed by stderr. Neither applies a timeout: every child is spawned
//! with `kill_on_drop(true)`, so dropping the returned future kills it.

use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;

use crate::error::ExecutorError;

/// Output of a finished child process.
#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Stdout then stderr, as a single buffer.
    pub fn combined(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        out.extend_from_slice(&self.stdout);
        out.extend_from_slice(&self.stderr);
        out
    }

    /// One-line description of a failed run: exit code plus trimmed stderr.
    pub fn failure_reason(&self) -> String {
        describe_failure(self.status, &self.stderr)
    }
}

fn describe_failure(status: ExitStatus, stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    match status.code() {
        Some(code) => format!("exit code {code}: {}", stderr.trim()),
        None => format!("terminated by signal: {}", stderr.trim()),
    }
}

/// Spawn `cmd`, write `payload` to its stdin, close stdin, and read stdout
/// to the end. A non-zero exit is reported as [`ExecutorError::Wait`].
pub async fn run_with_input(
    cmd: &mut Command,
    payload: &[u8],
    deal_id: &str,
) -> Result<Vec<u8>, ExecutorError> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| ExecutorError::Spawn {
        deal_id: deal_id.to_string(),
        source,
    })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| ExecutorError::StdinUnavailable {
            deal_id: deal_id.to_string(),
        })?;
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| ExecutorError::StdoutUnavailable {
            deal_id: deal_id.to_string(),
        })?;
    let stderr = child.stderr.take();

    let write = async move {
        let result = stdin.write_all(payload).await;
        // Closing stdin signals end of payload.
        drop(stdin);
        result
    };

    // Write and drain concurrently: a child that rejects the call may exit
    // without reading stdin, and one that writes a lot before reading would
    // otherwise stall on a full pipe.
    let (write_result, stdout_bytes, stderr_bytes) =
        tokio::join!(write, read_all(Some(stdout)), read_all(stderr));
    let stderr_bytes = stderr_bytes.unwrap_or_default();

    let status = child.wait().await.map_err(|e| ExecutorError::Wait {
        deal_id: deal_id.to_string(),
        reason: e.to_string(),
    })?;

    // The exit status outranks a broken pipe on stdin.
    if !status.success() {
        return Err(ExecutorError::Wait {
            deal_id: deal_id.to_string(),
            reason: describe_failure(status, &stderr_bytes),
        });
    }

    write_result.map_err(|source| ExecutorError::WriteJob {
        deal_id: deal_id.to_string(),
        source,
    })?;

    stdout_bytes.map_err(|source| ExecutorError::ReadOutput {
        deal_id: deal_id.to_string(),
        source,
    })
}

/// Run `cmd` with no stdin and capture both output streams.
///
/// The exit status is returned, not checked; spawn failures are returned
/// as the raw I/O error for the caller to wrap.
pub async fn run_combined(cmd: &mut Command) -> std::io::Result<CommandOutput> {
    cmd.stdin(Stdio::null()).kill_on_drop(true);
    let output = cmd.output().await?;
    Ok(CommandOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

async fn read_all<R: AsyncRead + Unpin>(handle: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        h.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(all(test, unix))]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[tokio::test]
    async fn input_is_piped_to_stdin() {
        let out = run_with_input(&mut sh("cat"), b"{\"key\":\"value\"}", "deal-1")
            .await
            .expect("run");
        assert_eq!(out, b"{\"key\":\"value\"}");
    }

    #[tokio::test]
    async fn nonzero_exit_is_wait_error() {
        let mut cmd = sh("cat >/dev/null; echo nope >&2; exit 3");
        let result = run_with_input(&mut cmd, b"x", "deal-1").await;
        assert_matches!(
            result,
            Err(ExecutorError::Wait { deal_id, reason })
                if deal_id == "deal-1"
                    && reason.contains("exit code 3")
                    && reason.contains("nope")
        );
    }

    /// A child that rejects the call without reading stdin reports its own
    /// exit status and stderr, not the broken pipe.
    #[tokio::test]
    async fn early_failing_exit_beats_broken_pipe() {
        let payload = vec![b'x'; 1024 * 1024];
        let mut cmd = sh("echo rejected >&2; exit 1");
        let result = run_with_input(&mut cmd, &payload, "deal-1").await;
        assert_matches!(
            result,
            Err(ExecutorError::Wait { deal_id, reason })
                if deal_id == "deal-1"
                    && reason.contains("exit code 1")
                    && reason.contains("rejected")
        );
    }

    #[tokio::test]
    async fn unread_payload_with_clean_exit_is_write_error() {
        let payload = vec![b'x'; 1024 * 1024];
        let result = run_with_input(&mut sh("exit 0"), &payload, "deal-1").await;
        assert_matches!(
            result,
            Err(ExecutorError::WriteJob { deal_id, .. }) if deal_id == "deal-1"
        );
    }

    #[tokio::test]
    async fn large_output_before_reading_input_does_not_stall() {
        let payload = vec![b'x'; 1024 * 1024];
        let mut cmd = sh("head -c 200000 /dev/zero; cat >/dev/null");
        let out = run_with_input(&mut cmd, &payload, "deal-1")
            .await
            .expect("run");
        assert_eq!(out.len(), 200_000);
    }

    #[tokio::test]
    async fn missing_binary_is_spawn_error() {
        let mut cmd = Command::new("/nonexistent/dealexec-backend");
        let result = run_with_input(&mut cmd, b"", "deal-2").await;
        assert_matches!(result, Err(ExecutorError::Spawn { deal_id, .. }) if deal_id == "deal-2");
    }

    #[tokio::test]
    async fn combined_output_orders_stdout_first() {
        let out = run_combined(&mut sh("echo err >&2; echo out"))
            .await
            .expect("run");
        assert!(out.status.success());
        assert_eq!(out.combined(), b"out\nerr\n");
    }

    #[tokio::test]
    async fn failure_reason_includes_exit_code_and_stderr() {
        let out = run_combined(&mut sh("echo 'job not found' >&2; exit 1"))
            .await
            .expect("run");
        assert!(!out.status.success());
        assert_eq!(out.failure_reason(), "exit code 1: job not found");
    }
}
