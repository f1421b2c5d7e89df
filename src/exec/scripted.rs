//! Deterministic runner that replays queued responses

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use super::{empty_argv, CommandRunner};
use crate::error::{HomelabError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Stdout(String),
    Failure { stderr: String, returncode: i32 },
    Timeout,
}

/// Replays responses in FIFO order and records every argv it was asked to run.
///
/// Used by tests and benches in place of `kubectl`.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    queue: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, value: Value) -> Self {
        self.queue.lock().push_back(Scripted::Stdout(value.to_string()));
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.queue.lock().push_back(Scripted::Stdout(text.into()));
        self
    }

    pub fn with_failure(self, stderr: impl Into<String>, returncode: i32) -> Self {
        self.queue.lock().push_back(Scripted::Failure {
            stderr: stderr.into(),
            returncode,
        });
        self
    }

    pub fn with_timeout(self) -> Self {
        self.queue.lock().push_back(Scripted::Timeout);
        self
    }

    /// Every argv run so far, oldest first
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.lock().len()
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run_stdout(&self, argv: &[String]) -> Result<String> {
        if argv.is_empty() {
            return Err(empty_argv());
        }
        self.calls.lock().push(argv.to_vec());

        let next = self.queue.lock().pop_front();
        match next {
            Some(Scripted::Stdout(stdout)) => Ok(stdout),
            Some(Scripted::Failure { stderr, returncode }) => {
                Err(HomelabError::CommandFailed { stderr, returncode })
            }
            Some(Scripted::Timeout) => Err(HomelabError::Timeout),
            None => Err(HomelabError::Internal(format!(
                "no scripted response for {}",
                argv.join(" ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandOutput;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order_and_records_calls() {
        let runner = ScriptedRunner::new()
            .with_text("pod-a")
            .with_json(json!({"ok": true}))
            .with_timeout();

        let argv = vec!["kubectl".to_string(), "version".to_string()];
        assert_eq!(
            runner.run(&argv).await.unwrap(),
            CommandOutput::Text("pod-a".to_string())
        );
        assert_eq!(
            runner.run(&argv).await.unwrap(),
            CommandOutput::Json(json!({"ok": true}))
        );
        assert!(matches!(
            runner.run(&argv).await,
            Err(HomelabError::Timeout)
        ));
        assert!(matches!(
            runner.run(&argv).await,
            Err(HomelabError::Internal(_))
        ));
        assert_eq!(runner.calls().len(), 4);
        assert_eq!(runner.remaining(), 0);
    }
}
