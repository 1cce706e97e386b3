use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::time::timeout;

use super::{CandidateSigner, validate_secret_hex};
use crate::errors::HarnessError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Candidate signer that shells out once per invocation.
///
/// Contract with the child process: the hex secret key is its sole argument,
/// the raw message bytes arrive on stdin (closing the pipe signals
/// end-of-input), and everything it writes to stdout until exit is the
/// base64-encoded signature.
pub struct SubprocessSigner {
    program: PathBuf,
    timeout: Duration,
}

impl SubprocessSigner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into(), timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn io_err(stage: &str, e: std::io::Error) -> HarnessError {
        HarnessError::CandidateIo(format!("{stage}: {e}"))
    }

    async fn drive(mut child: Child, message: &[u8]) -> Result<Vec<u8>, HarnessError> {
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(message).await.map_err(|e| Self::io_err("writing message", e))?;
            stdin.shutdown().await.map_err(|e| Self::io_err("closing stdin", e))?;
        }
        // Stdin is dropped here; the child sees end-of-input.
        let output =
            child.wait_with_output().await.map_err(|e| Self::io_err("collecting output", e))?;
        if !output.status.success() {
            // Exit status carries no meaning beyond started/failed-to-start;
            // whatever was emitted still goes through comparison.
            log::debug!("candidate exited with {}", output.status);
        }
        Ok(output.stdout)
    }
}

impl CandidateSigner for SubprocessSigner {
    async fn sign(&self, secret_hex: &str, message: &[u8]) -> Result<String, HarnessError> {
        validate_secret_hex(secret_hex)?;
        let mut cmd = Command::new(&self.program);
        cmd.arg(secret_hex)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);
        let child = cmd.spawn().map_err(|e| HarnessError::Spawn {
            program: self.program.display().to_string(),
            detail: e.to_string(),
        })?;
        log::debug!(
            "candidate spawned: {} ({} message bytes)",
            self.program.display(),
            message.len()
        );
        let stdout = match timeout(self.timeout, Self::drive(child, message)).await {
            Ok(r) => r?,
            // The timed-out child is killed when the future is dropped
            // (kill_on_drop), releasing its pipes before we report.
            Err(_) => {
                return Err(HarnessError::Timeout {
                    program: self.program.display().to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
        };
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}
