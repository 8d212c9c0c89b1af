//! Configuration, paths, and logging setup shared by Strainlog binaries.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_APP_ID, DEFAULT_BACKEND_URL, DEFAULT_LOG_LEVEL, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_PUBLISHABLE_KEY,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, log_config};
pub use paths::Paths;
