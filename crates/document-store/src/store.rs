//! The document store boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CollectionPath, SnapshotStream, StoreResult};

/// A stored document: its id within the collection and its JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Shallow merge: every top-level key of `fields` replaces the stored one.
pub fn merge_fields(existing: Option<Value>, fields: Map<String, Value>) -> Value {
    let mut merged = match existing {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    merged.extend(fields);
    Value::Object(merged)
}

/// The backend capabilities the sync layer consumes.
///
/// Writes are idempotent upserts and deletes of missing documents succeed.
/// Nothing here is transactional across calls.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Opens a live view of `path`. The first item is the current contents.
    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<SnapshotStream>;

    /// Merges `fields` into document `id`, creating it if absent. With no
    /// id a fresh one is assigned. Returns the document id.
    async fn write_merge(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> StoreResult<String>;

    /// Removes document `id`. Removing a missing document is not an error.
    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()>;
}

/// Fresh document id.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
