//! Configuration management.
//!
//! Backend credentials, the app identifier and the bootstrap token are
//! injected values: they are carried through to the session and store
//! without further validation.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default backend URL (can be overridden at compile time via STRAINLOG_BACKEND_URL env var).
pub const DEFAULT_BACKEND_URL: &str = match option_env!("STRAINLOG_BACKEND_URL") {
    Some(url) => url,
    None => "https://strainlog.supabase.co",
};

/// Default publishable key (can be overridden at compile time via STRAINLOG_PUBLISHABLE_KEY env var).
pub const DEFAULT_PUBLISHABLE_KEY: &str = match option_env!("STRAINLOG_PUBLISHABLE_KEY") {
    Some(key) => key,
    None => "public-anon-key",
};

/// Default app identifier, the first segment of every collection path.
pub const DEFAULT_APP_ID: &str = "default-app-id";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default interval between collection polls against the REST backend.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Backend project URL.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Publishable API key (public, safe to expose).
    #[serde(default = "default_publishable_key")]
    pub publishable_key: String,
    /// App identifier used as the collection path root.
    #[serde(default = "default_app_id")]
    pub app_id: String,
    /// External sign-in token, if the host environment supplies one.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Poll interval for live collection views, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_publishable_key() -> String {
    DEFAULT_PUBLISHABLE_KEY.to_string()
}

fn default_app_id() -> String {
    DEFAULT_APP_ID.to_string()
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            backend_url: default_backend_url(),
            publishable_key: default_publishable_key(),
            app_id: default_app_id(),
            auth_token: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Some(log_level) = env_value("STRAINLOG_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(url) = env_value("STRAINLOG_BACKEND_URL") {
            self.backend_url = url;
        }
        if let Some(key) = env_value("STRAINLOG_PUBLISHABLE_KEY") {
            self.publishable_key = key;
        }
        if let Some(app_id) = env_value("STRAINLOG_APP_ID") {
            self.app_id = app_id;
        }
        if let Some(token) = env_value("STRAINLOG_AUTH_TOKEN") {
            self.auth_token = Some(token);
        }
    }

    /// The level to log at: an explicit `flag` wins over the configured one.
    pub fn log_level_or<'a>(&'a self, flag: Option<&'a str>) -> &'a str {
        flag.map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(&self.log_level)
    }

    /// Get the backend URL as a parsed URL.
    pub fn backend_url(&self) -> CoreResult<Url> {
        Url::parse(&self.backend_url).map_err(CoreError::from)
    }

    /// Poll interval as a duration, never shorter than 100ms.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(100))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}
