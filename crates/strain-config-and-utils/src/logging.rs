//! Logging initialization.
//!
//! Wraps the observability package so binaries only pick a level and a
//! service name. Everything else logs through plain `tracing` macros.

use std::path::PathBuf;

use observability::LogConfig;

/// Initialize the logging system for a Strainlog binary.
///
/// `RUST_LOG` takes precedence over `level`. When `log_path` is given and the
/// observability package is built with its `jsonl` feature, structured lines
/// are appended to that file.
///
/// # Example
///
/// ```ignore
/// init_logging("cli", "warn", None);
/// tracing::info!("started");
/// ```
pub fn init_logging(service_name: &str, level: &str, log_path: Option<PathBuf>) {
    observability::init_with_config(log_config(service_name, level, log_path));
}

/// Build the subscriber settings for a binary.
pub fn log_config(service_name: &str, level: &str, log_path: Option<PathBuf>) -> LogConfig {
    let also_stderr = std::env::var("STRAINLOG_LOG_STDERR")
        .map(|raw| matches!(raw.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path,
        also_stderr,
    }
}
