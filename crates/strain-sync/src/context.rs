//! The explicitly constructed session context.

use std::sync::Arc;

use auth_engine::{Identity, Role, SessionManager, SupabaseAuthClient};
use document_store::{DocumentStore, SupabaseDocumentStore};
use strain_config_and_utils::{Config, CoreResult};
use tracing::info;

use crate::{CollectionSubscriptions, MutationGateway};

/// Owns the session and the store for the lifetime of the process and
/// hands out the components that need them.
#[derive(Clone)]
pub struct SessionContext {
    app_id: String,
    session: Arc<SessionManager>,
    store: Arc<dyn DocumentStore>,
}

impl SessionContext {
    pub fn new(
        app_id: impl Into<String>,
        session: Arc<SessionManager>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            session,
            store,
        }
    }

    /// Bootstrap an identity against the configured Supabase project and
    /// build a store that acts on its behalf.
    ///
    /// Never fails on auth: an unauthenticated context is still returned.
    pub async fn connect(config: &Config) -> CoreResult<Self> {
        let backend_url = config.backend_url()?;
        let api_url = backend_url.as_str();

        let auth = SupabaseAuthClient::new(api_url, config.publishable_key.clone());
        let session = Arc::new(SessionManager::new(Arc::new(auth)));
        let identity = session.bootstrap(config.auth_token.as_deref()).await;

        let store = SupabaseDocumentStore::new(
            api_url,
            config.publishable_key.clone(),
            identity.and_then(|identity| identity.access_token),
            config.poll_interval(),
        );

        info!(app_id = %config.app_id, backend = %api_url, "Session context ready");
        Ok(Self::new(config.app_id.clone(), session, Arc::new(store)))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    pub fn role(&self) -> Option<Role> {
        self.session.role()
    }

    /// Start the live collection views. Requires a tokio runtime.
    pub fn subscriptions(&self) -> CollectionSubscriptions {
        CollectionSubscriptions::spawn(self.store.clone(), self.app_id.clone(), self.session.subscribe())
    }

    pub fn gateway(&self) -> MutationGateway {
        MutationGateway::new(self.store.clone(), self.app_id.clone(), self.session.subscribe())
    }
}
