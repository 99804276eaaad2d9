use serde_json::Value;
use tracing_subscriber::EnvFilter;

use super::{LogLevel, Logger};

/// Forwards host log calls to `tracing`, with the metadata rendered as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str, metadata: Value) {
        match level {
            LogLevel::Debug => tracing::debug!(metadata = %metadata, "{}", message),
            LogLevel::Info => tracing::info!(metadata = %metadata, "{}", message),
            LogLevel::Warn => tracing::warn!(metadata = %metadata, "{}", message),
            LogLevel::Error => tracing::error!(metadata = %metadata, "{}", message),
        }
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Already installed in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
