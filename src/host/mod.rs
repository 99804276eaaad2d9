//! Everything the orchestrator needs from the outside world.
//!
//! Parameters, environment, variables, logging and the app call primitive
//! are reached through [`HostContext`] instead of ambient globals, so tests
//! can swap any of them for fakes.

mod cli;
mod logging;

use crate::mcp::{ToolArguments, ToolId};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub use cli::CliPlatform;
pub use logging::{init_tracing, TracingLogger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str, metadata: Value);

    fn debug(&self, message: &str, metadata: Value) {
        self.log(LogLevel::Debug, message, metadata);
    }

    fn info(&self, message: &str, metadata: Value) {
        self.log(LogLevel::Info, message, metadata);
    }

    fn warn(&self, message: &str, metadata: Value) {
        self.log(LogLevel::Warn, message, metadata);
    }

    fn error(&self, message: &str, metadata: Value) {
        self.log(LogLevel::Error, message, metadata);
    }
}

pub trait Platform: Send + Sync {
    /// Input parameter supplied by the caller.
    fn param(&self, name: &str) -> Option<Value>;

    /// Environment value such as a secret or a port.
    fn env(&self, name: &str) -> Option<String>;

    /// Tunable variable such as the model identifier.
    fn variable(&self, name: &str) -> Option<String>;

    /// Checks required parameters, returning a caller-facing message on failure.
    fn validate_params(&self) -> Result<(), String>;
}

/// The generic "call a function on an app" primitive.
#[async_trait]
pub trait AppInvoker: Send + Sync {
    async fn call(&self, tool: &ToolId, arguments: &ToolArguments) -> Result<Value, String>;
}

#[derive(Clone)]
pub struct HostContext {
    pub platform: Arc<dyn Platform>,
    pub logger: Arc<dyn Logger>,
    pub invoker: Arc<dyn AppInvoker>,
}

impl HostContext {
    pub fn new(
        platform: Arc<dyn Platform>,
        logger: Arc<dyn Logger>,
        invoker: Arc<dyn AppInvoker>,
    ) -> Self {
        Self {
            platform,
            logger,
            invoker,
        }
    }
}
