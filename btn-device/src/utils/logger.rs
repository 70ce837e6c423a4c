//! Logging Infrastructure
//!
//! Structured logging for the device node. `RUST_LOG` wins over the configured
//! level when set.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Log file prefix inside the log directory
const LOG_FILE_PREFIX: &str = "btn-device";

/// Initialize the logger with defaults (info, stdout)
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON formatting and file output
///
/// File output rolls daily and is only used when `log_dir` exists.
/// Calling this twice is harmless: the second call keeps the first subscriber.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let file_dir = log_dir
        .map(Path::new)
        .filter(|path| path.exists())
        .and_then(Path::to_str);

    let result = match (file_dir, json.unwrap_or(false)) {
        (Some(dir), true) => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            builder.json().with_writer(file_appender).try_init()
        }
        (Some(dir), false) => {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            builder.with_ansi(false).with_writer(file_appender).try_init()
        }
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "Logger already initialized");
    }
}
