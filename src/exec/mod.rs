//! External command execution
//!
//! Every query funnels through a [`CommandRunner`]. The production runner
//! spawns a real child process; [`ScriptedRunner`] replays canned output.

mod process;
mod scripted;

pub use process::ProcessRunner;
pub use scripted::ScriptedRunner;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{HomelabError, Result};

/// Successful command output, decoded as far as it goes
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// stdout decoded as JSON
    Json(Value),
    /// stdout that is not JSON
    Text(String),
}

impl CommandOutput {
    /// Decode stdout, falling back to raw text
    pub fn parse(stdout: &str) -> Self {
        match serde_json::from_str(stdout) {
            Ok(value) => CommandOutput::Json(value),
            Err(_) => CommandOutput::Text(stdout.to_string()),
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            CommandOutput::Json(value) => value,
            CommandOutput::Text(output) => json!({ "output": output }),
        }
    }
}

/// Render a command result as its JSON document:
/// `{error, returncode}`, `{error}`, `{output}` or the decoded payload.
pub fn command_document(result: &Result<CommandOutput>) -> Value {
    match result {
        Ok(output) => output.clone().into_value(),
        Err(err) => match err.returncode() {
            Some(code) => json!({ "error": err.to_string(), "returncode": code }),
            None => json!({ "error": err.to_string() }),
        },
    }
}

/// Runs an argument vector and reports what happened
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// stdout of a successful run, undecoded
    async fn run_stdout(&self, argv: &[String]) -> Result<String>;

    async fn run(&self, argv: &[String]) -> Result<CommandOutput> {
        let stdout = self.run_stdout(argv).await?;
        Ok(CommandOutput::parse(&stdout))
    }
}

pub(crate) fn empty_argv() -> HomelabError {
    HomelabError::InvalidInput("empty command line".to_string())
}
