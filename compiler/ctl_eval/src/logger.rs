//! Script-level logging (`print_log`).

use std::sync::Arc;

use ctl_types::LogLevel;
use tracing::{debug, error, info, trace, warn};

/// Sink for messages a script logs with `print_log`.
pub trait ScriptLogger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Shared logger handle.
pub type SharedLogger = Arc<dyn ScriptLogger>;

/// Forwards script messages to `tracing` under target `ctl::script`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingLogger;

impl ScriptLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Trace => trace!(target: "ctl::script", "{message}"),
            LogLevel::Debug => debug!(target: "ctl::script", "{message}"),
            LogLevel::Info => info!(target: "ctl::script", "{message}"),
            LogLevel::Warn => warn!(target: "ctl::script", "{message}"),
            LogLevel::Error => error!(target: "ctl::script", "{message}"),
            LogLevel::Fatal => error!(target: "ctl::script", fatal = true, "{message}"),
        }
    }
}

pub fn tracing_logger() -> SharedLogger {
    Arc::new(TracingLogger)
}
