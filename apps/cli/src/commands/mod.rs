//! CLI command implementations.

mod admin;
mod legality;
mod stats;
mod strains;

pub use admin::admin;
pub use legality::legality;
pub use stats::stats;
pub use strains::{add, community, delete, list, update, watch};

use std::time::Duration;

use anyhow::{Context, Result};
use strain_config_and_utils::{Config, Paths};
use strain_sync::{SessionContext, SharedList};
use tokio::sync::watch;
use tracing::{debug, warn};

/// How long to wait for the first snapshot of a collection.
const SNAPSHOT_TIMEOUT: Duration = Duration::from_secs(10);

/// Load the config and bootstrap a session against the backend.
async fn connect() -> Result<SessionContext> {
    let paths = Paths::new()?;
    let config = Config::load(&paths).context("failed to load config")?;
    let context = SessionContext::connect(&config)
        .await
        .context("failed to reach the backend")?;
    Ok(context)
}

/// Bail unless the session resolved to an identity.
fn require_identity(context: &SessionContext) -> Result<()> {
    if context.identity().is_none() {
        anyhow::bail!("Not signed in. Set STRAINLOG_AUTH_TOKEN or check the backend settings");
    }
    Ok(())
}

/// Wait for the first snapshot pushed into `rx`.
///
/// On timeout the current (possibly empty) list is returned, so a slow
/// backend shows stale data rather than nothing at all.
async fn first_snapshot<T>(mut rx: watch::Receiver<SharedList<T>>) -> SharedList<T> {
    match tokio::time::timeout(SNAPSHOT_TIMEOUT, rx.changed()).await {
        Ok(Ok(())) => debug!("Received first snapshot"),
        Ok(Err(_)) => debug!("Collection view closed before its first snapshot"),
        Err(_) => warn!(
            timeout_secs = SNAPSHOT_TIMEOUT.as_secs(),
            "Timed out waiting for first snapshot"
        ),
    }
    let snapshot = rx.borrow_and_update().clone();
    snapshot
}
