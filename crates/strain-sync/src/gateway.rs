//! Writes against the private collection, plus the community mirror on create.
//!
//! No error crosses this boundary. Every failure is logged and the caller
//! only sees that an operation was not acknowledged. Results show up later
//! through the live views, never as a local echo.

use std::sync::Arc;

use auth_engine::SessionState;
use chrono::Utc;
use document_store::{CollectionPath, DocumentStore};
use serde_json::Value;
use strain_types::{CommunityStrainEntry, EntryId, NewStrainEntry, StrainEntry, StrainUpdate, UserId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Create, update and delete for the current identity's reviews.
#[derive(Clone)]
pub struct MutationGateway {
    store: Arc<dyn DocumentStore>,
    app_id: String,
    session: watch::Receiver<SessionState>,
}

impl MutationGateway {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        app_id: impl Into<String>,
        session: watch::Receiver<SessionState>,
    ) -> Self {
        Self {
            store,
            app_id: app_id.into(),
            session,
        }
    }

    /// The resolved identity, or `None` after logging the rejection.
    fn require_identity(&self, operation: &'static str) -> Option<UserId> {
        let user_id = self
            .session
            .borrow()
            .identity
            .as_ref()
            .map(|identity| identity.user_id.clone());
        if user_id.is_none() {
            warn!(operation, "Rejected write: no signed-in identity");
        }
        user_id
    }

    fn private_collection(&self, user_id: &UserId) -> CollectionPath {
        CollectionPath::private_strains(&self.app_id, user_id)
    }

    /// Stores a new review and mirrors it into the community collection.
    ///
    /// Returns the private id once the private write is acknowledged. The
    /// mirror write is best-effort: if it fails the review stays private
    /// only and the id is still returned.
    pub async fn create(&self, candidate: NewStrainEntry) -> Option<EntryId> {
        let user_id = self.require_identity("create")?;
        let private = self.private_collection(&user_id);

        let mut entry = StrainEntry::new_for(user_id.clone(), candidate, Utc::now());
        let id = match self.store.write_merge(&private, None, entry.to_json()).await {
            Ok(id) => EntryId::from(id),
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Create failed");
                return None;
            }
        };
        entry.id = id.clone();
        info!(user_id = %user_id, entry_id = %id, strain = %entry.fields.strain_name, "Review created");

        let community = CollectionPath::community_strains(&self.app_id);
        let mirror = CommunityStrainEntry::snapshot_of(&entry, Utc::now());
        match self.store.write_merge(&community, None, mirror.to_json()).await {
            Ok(mirror_id) => debug!(entry_id = %id, mirror_id = %mirror_id, "Community mirror written"),
            Err(e) => warn!(
                entry_id = %id,
                error = %e,
                "Community mirror failed, review stays private only"
            ),
        }

        Some(id)
    }

    /// Merge-writes `update` onto a private review.
    ///
    /// Stamps the owner and a fresh `updatedAt`, never `createdAt`. A missing
    /// review is created. The community mirror is left as it was.
    pub async fn update(&self, id: &EntryId, update: StrainUpdate) -> bool {
        let Some(user_id) = self.require_identity("update") else {
            return false;
        };

        let mut fields = update.to_json();
        fields.insert("userId".to_string(), Value::String(user_id.to_string()));
        fields.insert("updatedAt".to_string(), Value::String(Utc::now().to_rfc3339()));

        let private = self.private_collection(&user_id);
        match self.store.write_merge(&private, Some(id.as_str()), fields).await {
            Ok(_) => {
                info!(user_id = %user_id, entry_id = %id, "Review updated");
                true
            }
            Err(e) => {
                warn!(user_id = %user_id, entry_id = %id, error = %e, "Update failed");
                false
            }
        }
    }

    /// Removes a private review. Its community mirror, if any, stays.
    pub async fn delete(&self, id: &EntryId) -> bool {
        let Some(user_id) = self.require_identity("delete") else {
            return false;
        };

        let private = self.private_collection(&user_id);
        match self.store.delete(&private, id.as_str()).await {
            Ok(()) => {
                info!(user_id = %user_id, entry_id = %id, "Review deleted");
                true
            }
            Err(e) => {
                warn!(user_id = %user_id, entry_id = %id, error = %e, "Delete failed");
                false
            }
        }
    }
}
