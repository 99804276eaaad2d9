use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled")]
    Cancelled,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tool name '{name}': {reason}")]
    InvalidToolName { name: String, reason: String },

    #[error("Tool '{0}' not found")]
    UnknownTool(String),

    #[error("Invalid arguments for tool '{tool}': {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("{0}")]
    Invocation(String),

    #[error("{0}")]
    Other(String),
}

/// Failure to reach or read the tool registry. Never leaves discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("tool registry unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("tool registry returned status {0}")]
    Status(u16),

    #[error("tool registry response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("tool discovery timed out after {0:?}")]
    Timeout(Duration),

    #[error("tool discovery cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, BridgeError>;
