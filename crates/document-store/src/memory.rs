//! In-process document store with live subscriptions.
//!
//! Used by tests and offline runs. Besides the [`DocumentStore`] contract it
//! exposes subscriber accounting and failure injection so callers can
//! observe listener leaks and exercise error paths.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::live::LiveHub;
use crate::store::{merge_fields, new_document_id};
use crate::{CollectionPath, Document, DocumentStore, SnapshotStream, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<CollectionPath, BTreeMap<String, Value>>,
    hub: LiveHub,
    failing_writes: HashSet<CollectionPath>,
    denied_subscriptions: HashSet<CollectionPath>,
}

impl Inner {
    fn snapshot(&self, path: &CollectionPath) -> Vec<Document> {
        self.collections
            .get(path)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn publish(&mut self, path: &CollectionPath) {
        let snapshot = self.snapshot(path);
        self.hub.notify(path, &snapshot);
    }
}

/// Document store held entirely in memory.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents of a collection, ordered by id.
    pub fn documents(&self, path: &CollectionPath) -> Vec<Document> {
        self.inner.lock().snapshot(path)
    }

    pub fn get(&self, path: &CollectionPath, id: &str) -> Option<Value> {
        self.inner
            .lock()
            .collections
            .get(path)
            .and_then(|docs| docs.get(id).cloned())
    }

    /// Live subscribers currently registered on `path`.
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.inner.lock().hub.subscriber_count(path)
    }

    /// Make every write to `path` fail until [`Self::restore_writes`].
    pub fn fail_writes(&self, path: &CollectionPath) {
        self.inner.lock().failing_writes.insert(path.clone());
    }

    pub fn restore_writes(&self, path: &CollectionPath) {
        self.inner.lock().failing_writes.remove(path);
    }

    /// Reject new subscriptions to `path` with a permission error.
    pub fn deny_subscriptions(&self, path: &CollectionPath) {
        self.inner.lock().denied_subscriptions.insert(path.clone());
    }

    /// Ends every live subscription on `path` with a permission error.
    pub fn break_subscriptions(&self, path: &CollectionPath, reason: &str) {
        let reason = reason.to_string();
        self.inner
            .lock()
            .hub
            .fail(path, || StoreError::PermissionDenied(reason.clone()));
    }

    fn check_writable(inner: &Inner, path: &CollectionPath) -> StoreResult<()> {
        if inner.failing_writes.contains(path) {
            return Err(StoreError::Unavailable(format!("writes to {} are failing", path)));
        }
        Ok(())
    }
}

fn release(inner: Weak<Mutex<Inner>>, path: CollectionPath, subscriber: u64) {
    if let Some(inner) = inner.upgrade() {
        inner.lock().hub.unsubscribe(&path, subscriber);
        debug!(collection = %path, "Released in-memory subscription");
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<SnapshotStream> {
        let mut inner = self.inner.lock();
        if inner.denied_subscriptions.contains(path) {
            return Err(StoreError::PermissionDenied(format!(
                "cannot listen to {}",
                path
            )));
        }

        let initial = inner.snapshot(path);
        let (subscriber, receiver) = inner.hub.subscribe(path, initial);
        drop(inner);

        let weak = Arc::downgrade(&self.inner);
        let owned_path = path.clone();
        Ok(SnapshotStream::new(receiver, move || {
            release(weak, owned_path, subscriber)
        }))
    }

    async fn write_merge(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        Self::check_writable(&inner, path)?;

        let id = id.map(str::to_string).unwrap_or_else(new_document_id);
        let docs = inner.collections.entry(path.clone()).or_default();
        let merged = merge_fields(docs.remove(&id), fields);
        docs.insert(id.clone(), merged);

        inner.publish(path);
        Ok(id)
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        Self::check_writable(&inner, path)?;

        let removed = inner
            .collections
            .get_mut(path)
            .and_then(|docs| docs.remove(id))
            .is_some();
        if removed {
            inner.publish(path);
        }
        Ok(())
    }
}
