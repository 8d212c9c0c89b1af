//! # Observability
//!
//! Centralized logging setup for Strainlog binaries.
//!
//! Binaries call `observability::init_with_config()` once at startup and use
//! standard `tracing` macros everywhere else. Library crates never install a
//! subscriber; they only emit events.
//!
//! ## JSONL mode
//!
//! With the `jsonl` feature, every event is appended as one JSON object per
//! line to `~/.strainlog/logs/strainlog.jsonl` (or `LogConfig::log_path`):
//!
//! - `tail -f ~/.strainlog/logs/strainlog.jsonl | jq` for pretty JSON
//!
//! Without it, events go to stderr through the compact fmt layer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         ..Default::default()
//!     });
//!
//!     tracing::info!("ready");
//! }
//! ```

#[cfg(feature = "jsonl")]
mod jsonl;

mod json_layer;

use std::path::PathBuf;

pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "cli", "watcher").
    /// Included in every JSONL line for filtering.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional custom log file path for JSONL mode.
    /// Defaults to `~/.strainlog/logs/strainlog.jsonl`.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr in JSONL mode.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging with custom configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_with_config(config: LogConfig) {
    #[cfg(feature = "jsonl")]
    {
        jsonl::init_jsonl_subscriber(&config);
    }

    #[cfg(not(feature = "jsonl"))]
    {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_level)),
            )
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(!config.also_stderr);
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_with_config(LogConfig {
            service_name: "first".into(),
            ..Default::default()
        });
        init_with_config(LogConfig {
            service_name: "second".into(),
            ..Default::default()
        });
    }
}
