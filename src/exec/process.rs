//! Child-process runner with a hard timeout

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::{empty_argv, CommandRunner};
use crate::config::ClusterConfig;
use crate::error::{HomelabError, Result};

/// Runs commands as real child processes.
///
/// Children are spawned with `kill_on_drop`, so a wait that is abandoned
/// for any reason (timeout, dropped request future) kills the process and
/// leaves reaping to tokio. Captured stdout and stderr are each capped at
/// `max_output_bytes`; anything past the cap is drained and discarded.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    timeout: Duration,
    max_output_bytes: usize,
}

impl ProcessRunner {
    pub fn new(timeout: Duration, max_output_bytes: usize) -> Self {
        Self {
            timeout,
            max_output_bytes,
        }
    }

    pub fn from_config(config: &ClusterConfig) -> Self {
        Self::new(config.command_timeout(), config.max_output_bytes)
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::from_config(&ClusterConfig::default())
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run_stdout(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv.split_first().ok_or_else(empty_argv)?;
        tracing::debug!(?argv, "spawning command");

        let started = Instant::now();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(HomelabError::Spawn)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let cap = self.max_output_bytes;

        let collect = async {
            tokio::try_join!(
                child.wait(),
                read_capped(stdout, cap),
                read_capped(stderr, cap)
            )
        };
        let outcome = tokio::time::timeout(self.timeout, collect).await;

        let (status, stdout, stderr) = match outcome {
            Ok(Ok(collected)) => collected,
            Ok(Err(e)) => return Err(HomelabError::Io(e)),
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill timed out command {}: {}", program, e);
                }
                tracing::warn!(
                    ?argv,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "command timed out"
                );
                return Err(HomelabError::Timeout);
            }
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if !status.success() {
            let returncode = status.code().unwrap_or(-1);
            tracing::warn!(?argv, returncode, elapsed_ms, "command failed");
            return Err(HomelabError::CommandFailed {
                stderr: String::from_utf8_lossy(&stderr).into_owned(),
                returncode,
            });
        }

        tracing::debug!(program = %program, elapsed_ms, bytes = stdout.len(), "command finished");
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Read up to `cap` bytes, then drain the rest so the child never blocks on a full pipe
async fn read_capped<R>(reader: Option<R>, cap: usize) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(Vec::new());
    };

    let mut buf = Vec::new();
    (&mut reader).take(cap as u64).read_to_end(&mut buf).await?;

    let discarded = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await?;
    if discarded > 0 {
        tracing::warn!(cap, discarded, "command output truncated");
    }

    Ok(buf)
}
