//! Subprocess wrapper around `bird search <query> --json`.
//!
//! One process per call. Stdout is captured in full and decoded as JSON once the
//! process exits; stderr is kept only for error reporting.
use research_common::{DEFAULT_TIMEOUT, snippet};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;

/// Binary looked up on `PATH` when no explicit path is configured.
pub const DEFAULT_BINARY: &str = "bird";

const OUTPUT_SNIPPET_MAX: usize = 500;

#[derive(Debug, Error)]
pub enum BirdError {
    #[error("failed to launch {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{binary} did not finish within {timeout:?}")]
    Timeout { binary: String, timeout: Duration },
    #[error("{binary} exited with status {code:?}: {stderr}")]
    Exit {
        binary: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("invalid JSON on stdout: {source}, stdout_snippet: {stdout}")]
    Decode {
        #[source]
        source: serde_json::Error,
        stdout: String,
    },
}

impl BirdError {
    /// True when the tool ran successfully but printed something other than JSON.
    pub fn is_decode(&self) -> bool {
        matches!(self, BirdError::Decode { .. })
    }
}

/// Handle on the external `bird` tool.
///
/// ```
/// use research_social::BirdCli;
/// use std::time::Duration;
///
/// let bird = BirdCli::new()
///     .with_binary("/opt/bird/bin/bird")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(bird.timeout(), Duration::from_secs(5));
/// assert_eq!(BirdCli::search_args("rust lang"), ["search", "rust lang", "--json"]);
/// ```
#[derive(Clone, Debug)]
pub struct BirdCli {
    binary: PathBuf,
    timeout: Duration,
}

impl Default for BirdCli {
    fn default() -> Self {
        Self::new()
    }
}

impl BirdCli {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Argument vector passed to the tool. The query stays a single argument.
    pub fn search_args(query: &str) -> [&str; 3] {
        ["search", query, "--json"]
    }

    /// Run a search and decode stdout as JSON.
    pub async fn search(&self, query: &str) -> Result<Value, BirdError> {
        let binary = self.binary.display().to_string();
        let mut cmd = Command::new(&self.binary);
        cmd.args(Self::search_args(query))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // a timed-out child is killed when its future is dropped
            .kill_on_drop(true);

        let started = Instant::now();
        tracing::info!(
            target: "social.bird",
            binary = %binary,
            query = %snippet(query, 160),
            timeout_ms = self.timeout.as_millis() as u64,
            "bird.search.start"
        );

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(source)) => {
                tracing::warn!(target: "social.bird", binary = %binary, error = %source, "bird.search.spawn_error");
                return Err(BirdError::Spawn { binary, source });
            }
            Err(_) => {
                tracing::warn!(
                    target: "social.bird",
                    binary = %binary,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "bird.search.timeout"
                );
                return Err(BirdError::Timeout {
                    binary,
                    timeout: self.timeout,
                });
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if !output.status.success() {
            let stderr = snippet(&String::from_utf8_lossy(&output.stderr), OUTPUT_SNIPPET_MAX);
            let code = output.status.code();
            tracing::warn!(
                target: "social.bird",
                binary = %binary,
                ?code,
                elapsed_ms,
                stderr = %stderr,
                "bird.search.exit_error"
            );
            return Err(BirdError::Exit {
                binary,
                code,
                stderr,
            });
        }

        let value = serde_json::from_slice::<Value>(&output.stdout).map_err(|source| {
            let stdout = snippet(&String::from_utf8_lossy(&output.stdout), OUTPUT_SNIPPET_MAX);
            tracing::warn!(
                target: "social.bird",
                binary = %binary,
                error = %source,
                stdout_snippet = %stdout,
                "bird.search.decode_error"
            );
            BirdError::Decode { source, stdout }
        })?;

        tracing::info!(
            target: "social.bird",
            binary = %binary,
            elapsed_ms,
            stdout_len = output.stdout.len(),
            "bird.search.success"
        );
        Ok(value)
    }
}
