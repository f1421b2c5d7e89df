//! Error types for homelab-mcp

use thiserror::Error;

/// Result type alias for homelab operations
pub type Result<T> = std::result::Result<T, HomelabError>;

/// Main error type for homelab queries and transports
#[derive(Error, Debug)]
pub enum HomelabError {
    /// The child process exited non-zero. Displays the captured stderr as-is.
    #[error("{stderr}")]
    CommandFailed { stderr: String, returncode: i32 },

    #[error("Command timed out")]
    Timeout,

    #[error("{0}")]
    Spawn(#[source] std::io::Error),

    /// A query step failed; `context` names the step for the caller.
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: Box<HomelabError>,
    },

    #[error("Error: Could not find rook-ceph-tools pod")]
    ToolsPodNotFound,

    #[error("Error parsing alerts: {0}")]
    AlertParse(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HomelabError {
    /// Wrap a lower-level failure with the name of the query step that hit it
    pub fn context(self, context: &'static str) -> Self {
        HomelabError::Query {
            context,
            source: Box::new(self),
        }
    }

    /// Exit code of the failed command, if this error came from one
    pub fn returncode(&self) -> Option<i32> {
        match self {
            HomelabError::CommandFailed { returncode, .. } => Some(*returncode),
            HomelabError::Query { source, .. } => source.returncode(),
            _ => None,
        }
    }

    /// True when the caller sent something we refuse before running anything
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HomelabError::UnknownTool(_) | HomelabError::InvalidInput(_)
        )
    }

    /// Get error code for MCP protocol
    pub fn code(&self) -> i64 {
        match self {
            HomelabError::UnknownTool(_) => -32602,
            HomelabError::InvalidInput(_) => -32602,
            HomelabError::Serialization(_) => -32700,
            _ => -32000,
        }
    }
}
