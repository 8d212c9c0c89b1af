//! Live private and community collection views.
//!
//! A supervisor task follows the session. Whenever the resolved identity
//! changes it stops the running pumps (and waits for them) before opening
//! new subscriptions for the new identity. Each pump is the only writer of
//! its list and publishes fully replaced snapshots through a `watch`
//! channel, so readers never see a partially applied update.

use std::sync::Arc;

use auth_engine::SessionState;
use document_store::{CollectionPath, Document, DocumentStore, SnapshotStream};
use strain_types::{CommunityStrainEntry, StrainEntry, UserId};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A snapshot of one collection as seen by readers.
pub type SharedList<T> = Arc<Vec<T>>;

/// Records that can be decoded from a stored document.
pub(crate) trait FromDocument: Sized {
    fn from_document(document: Document) -> Result<Self, serde_json::Error>;
}

impl FromDocument for StrainEntry {
    fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        StrainEntry::from_json(document.id, document.data)
    }
}

impl FromDocument for CommunityStrainEntry {
    fn from_document(document: Document) -> Result<Self, serde_json::Error> {
        CommunityStrainEntry::from_json(document.id, document.data)
    }
}

/// Decodes a snapshot, skipping documents that do not decode.
fn decode_snapshot<T: FromDocument>(collection: &CollectionPath, documents: Vec<Document>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| {
            let id = document.id.clone();
            match T::from_document(document) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection = %collection, document_id = %id, error = %e, "Skipping undecodable document");
                    None
                }
            }
        })
        .collect()
}

/// A running subscription pump.
struct Pump {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Pump {
    fn spawn<T>(
        collection: CollectionPath,
        stream: SnapshotStream,
        list_tx: Arc<watch::Sender<SharedList<T>>>,
    ) -> Self
    where
        T: FromDocument + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_pump(collection, stream, list_tx, shutdown_rx));
        Self { shutdown_tx, task }
    }

    /// Stops the pump and waits until its listener is released.
    async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            warn!(error = %e, "Subscription pump ended abnormally");
        }
    }
}

async fn run_pump<T: FromDocument>(
    collection: CollectionPath,
    mut stream: SnapshotStream,
    list_tx: Arc<watch::Sender<SharedList<T>>>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => break,
            event = stream.next() => match event {
                Some(Ok(documents)) => {
                    let records: Vec<T> = decode_snapshot(&collection, documents);
                    debug!(collection = %collection, count = records.len(), "Snapshot applied");
                    list_tx.send_replace(Arc::new(records));
                }
                Some(Err(e)) => {
                    // Keep the last good list; the stream will not recover
                    warn!(collection = %collection, error = %e, "Subscription error, keeping last snapshot");
                }
                None => {
                    debug!(collection = %collection, "Subscription stream ended");
                    break;
                }
            }
        }
    }

    stream.cancel();
}

/// Pumps for one identity.
struct ActiveViews {
    user_id: UserId,
    pumps: Vec<Pump>,
}

impl ActiveViews {
    async fn stop(self) {
        for pump in self.pumps {
            pump.stop().await;
        }
        debug!(user_id = %self.user_id, "Released collection subscriptions");
    }
}

struct Supervisor {
    store: Arc<dyn DocumentStore>,
    app_id: String,
    private_tx: Arc<watch::Sender<SharedList<StrainEntry>>>,
    community_tx: Arc<watch::Sender<SharedList<CommunityStrainEntry>>>,
}

impl Supervisor {
    async fn open(&self, user_id: &UserId) -> ActiveViews {
        let mut pumps = Vec::with_capacity(2);

        let private = CollectionPath::private_strains(&self.app_id, user_id);
        if let Some(stream) = self.subscribe(&private).await {
            pumps.push(Pump::spawn(private, stream, self.private_tx.clone()));
        }

        let community = CollectionPath::community_strains(&self.app_id);
        if let Some(stream) = self.subscribe(&community).await {
            pumps.push(Pump::spawn(community, stream, self.community_tx.clone()));
        }

        info!(user_id = %user_id, live = pumps.len(), "Opened collection subscriptions");
        ActiveViews {
            user_id: user_id.clone(),
            pumps,
        }
    }

    async fn subscribe(&self, collection: &CollectionPath) -> Option<SnapshotStream> {
        match self.store.subscribe(collection).await {
            Ok(stream) => Some(stream),
            Err(e) => {
                warn!(collection = %collection, error = %e, "Could not open subscription, keeping last snapshot");
                None
            }
        }
    }

    async fn run(self, mut session: watch::Receiver<SessionState>, mut shutdown_rx: oneshot::Receiver<()>) {
        let mut active: Option<ActiveViews> = None;

        loop {
            let wanted = {
                let state = session.borrow_and_update();
                if state.ready {
                    state.identity.as_ref().map(|identity| identity.user_id.clone())
                } else {
                    None
                }
            };

            let current = active.as_ref().map(|views| &views.user_id);
            if wanted.as_ref() != current {
                if let Some(views) = active.take() {
                    views.stop().await;
                    // The old identity's private records must not leak into the next one
                    self.private_tx.send_replace(Arc::new(Vec::new()));
                }
                if let Some(user_id) = &wanted {
                    active = Some(self.open(user_id).await);
                }
            }

            tokio::select! {
                _ = &mut shutdown_rx => break,
                changed = session.changed() => {
                    if changed.is_err() {
                        // Session owner is gone; hold the current views until shutdown
                        let _ = (&mut shutdown_rx).await;
                        break;
                    }
                }
            }
        }

        if let Some(views) = active.take() {
            views.stop().await;
        }
        debug!("Collection supervisor stopped");
    }
}

/// The two live collection views for the current session identity.
///
/// Dropping the handle asks the background tasks to release their
/// subscriptions; [`CollectionSubscriptions::shutdown`] also waits for it.
pub struct CollectionSubscriptions {
    private_rx: watch::Receiver<SharedList<StrainEntry>>,
    community_rx: watch::Receiver<SharedList<CommunityStrainEntry>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl CollectionSubscriptions {
    /// Start following `session`. Must be called inside a tokio runtime.
    pub fn spawn(
        store: Arc<dyn DocumentStore>,
        app_id: impl Into<String>,
        session: watch::Receiver<SessionState>,
    ) -> Self {
        let (private_tx, private_rx) = watch::channel(SharedList::default());
        let (community_tx, community_rx) = watch::channel(SharedList::default());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let supervisor = Supervisor {
            store,
            app_id: app_id.into(),
            private_tx: Arc::new(private_tx),
            community_tx: Arc::new(community_tx),
        };
        let task = tokio::spawn(supervisor.run(session, shutdown_rx));

        Self {
            private_rx,
            community_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// Latest private snapshot.
    pub fn private_entries(&self) -> SharedList<StrainEntry> {
        self.private_rx.borrow().clone()
    }

    /// Latest community snapshot.
    pub fn community_entries(&self) -> SharedList<CommunityStrainEntry> {
        self.community_rx.borrow().clone()
    }

    /// Receiver notified on every private snapshot.
    pub fn watch_private(&self) -> watch::Receiver<SharedList<StrainEntry>> {
        self.private_rx.clone()
    }

    /// Receiver notified on every community snapshot.
    pub fn watch_community(&self) -> watch::Receiver<SharedList<CommunityStrainEntry>> {
        self.community_rx.clone()
    }

    /// Release both subscriptions and wait until they are gone.
    pub async fn shutdown(mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Collection supervisor ended abnormally");
            }
        }
    }
}

impl Drop for CollectionSubscriptions {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_skips_malformed_documents() {
        let collection = CollectionPath::from_string("app/users/u1/strains");
        let documents = vec![
            Document::new(
                "good",
                json!({ "strainName": "Blue Dream", "rating": 4, "userId": "u1", "updatedAt": "2024-05-01T12:00:00Z" }),
            ),
            Document::new("bad-rating", json!({ "rating": "five", "userId": "u1", "updatedAt": "2024-05-01T12:00:00Z" })),
            Document::new("not-an-object", json!(42)),
        ];

        let entries: Vec<StrainEntry> = decode_snapshot(&collection, documents);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_str(), "good");
    }
}
