//! Supabase REST (PostgREST) document store.
//!
//! Documents live in one table:
//!
//! ```sql
//! create table documents (
//!     collection text not null,
//!     id         text not null,
//!     data       jsonb not null default '{}',
//!     primary key (collection, id)
//! );
//! ```
//!
//! Live views poll the collection and emit a snapshot whenever its content
//! changes. The first poll always emits.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::store::{merge_fields, new_document_id};
use crate::{CollectionPath, Document, DocumentStore, SnapshotStream, StoreError, StoreResult};

const TABLE: &str = "documents";

#[derive(Debug, Serialize)]
struct DocumentRow<'a> {
    collection: &'a str,
    id: &'a str,
    data: &'a Value,
}

#[derive(Debug, Deserialize)]
struct DataRow {
    data: Value,
}

/// Document store backed by a Supabase project.
#[derive(Clone)]
pub struct SupabaseDocumentStore {
    http_client: reqwest::Client,
    api_url: String,
    publishable_key: String,
    access_token: Option<String>,
    poll_interval: Duration,
}

impl SupabaseDocumentStore {
    /// Create a store for a project URL such as `https://xyz.supabase.co`.
    ///
    /// Requests carry `access_token` as bearer when given, otherwise the
    /// publishable key.
    pub fn new(
        api_url: impl Into<String>,
        publishable_key: impl Into<String>,
        access_token: Option<String>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            publishable_key: publishable_key.into(),
            access_token,
            poll_interval,
        }
    }

    fn rest_url(&self) -> String {
        format!("{}/rest/v1/{}", self.api_url, TABLE)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.publishable_key);
        request
            .header("apikey", &self.publishable_key)
            .header("Authorization", format!("Bearer {}", bearer))
    }

    /// Fetch every document of a collection, ordered by id.
    async fn fetch_collection(&self, path: &CollectionPath) -> StoreResult<Vec<Document>> {
        let response = self
            .authorized(self.http_client.get(self.rest_url()))
            .header("Accept", "application/json")
            .query(&[
                ("collection", format!("eq.{}", path)),
                ("select", "id,data".to_string()),
                ("order", "id.asc".to_string()),
            ])
            .send()
            .await?;

        let response = check_response(response).await?;
        Ok(response.json().await?)
    }

    async fn fetch_document(&self, path: &CollectionPath, id: &str) -> StoreResult<Option<Value>> {
        let response = self
            .authorized(self.http_client.get(self.rest_url()))
            .header("Accept", "application/json")
            .query(&[
                ("collection", format!("eq.{}", path)),
                ("id", format!("eq.{}", id)),
                ("select", "data".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let rows: Vec<DataRow> = check_response(response).await?.json().await?;
        Ok(rows.into_iter().next().map(|row| row.data))
    }

    /// Perform an upsert (POST with merge-duplicates).
    async fn upsert(&self, row: &DocumentRow<'_>) -> StoreResult<()> {
        let response = self
            .authorized(self.http_client.post(self.rest_url()))
            .header("Content-Type", "application/json")
            .header("Prefer", "resolution=merge-duplicates")
            .json(row)
            .send()
            .await?;

        check_response(response).await.map(|_| ())
    }
}

async fn check_response(response: reqwest::Response) -> StoreResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    error!(status, "Supabase request failed: {}", body);
    Err(StoreError::from_status(status, body))
}

/// Poll `path` until stopped, the receiver goes away, or a poll fails.
async fn poll_collection(
    store: SupabaseDocumentStore,
    path: CollectionPath,
    sender: mpsc::UnboundedSender<crate::SnapshotEvent>,
    mut stop: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(store.poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut last: Option<Vec<Document>> = None;

    loop {
        tokio::select! {
            _ = &mut stop => break,
            _ = ticker.tick() => {}
        }

        match store.fetch_collection(&path).await {
            Ok(documents) => {
                if last.as_ref() == Some(&documents) {
                    continue;
                }
                if sender.send(Ok(documents.clone())).is_err() {
                    break;
                }
                last = Some(documents);
            }
            Err(e) => {
                warn!(collection = %path, error = %e, "Collection poll failed, ending live view");
                let _ = sender.send(Err(e));
                break;
            }
        }
    }

    debug!(collection = %path, "Collection poller stopped");
}

#[async_trait]
impl DocumentStore for SupabaseDocumentStore {
    async fn subscribe(&self, path: &CollectionPath) -> StoreResult<SnapshotStream> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        tokio::spawn(poll_collection(self.clone(), path.clone(), sender, stop_rx));

        Ok(SnapshotStream::new(receiver, move || {
            let _ = stop_tx.send(());
        }))
    }

    async fn write_merge(
        &self,
        path: &CollectionPath,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> StoreResult<String> {
        let (id, existing) = match id {
            Some(id) => (id.to_string(), self.fetch_document(path, id).await?),
            None => (new_document_id(), None),
        };

        let data = merge_fields(existing, fields);
        self.upsert(&DocumentRow {
            collection: path.as_str(),
            id: &id,
            data: &data,
        })
        .await?;

        debug!(document = %path.document(&id), "Document written");
        Ok(id)
    }

    async fn delete(&self, path: &CollectionPath, id: &str) -> StoreResult<()> {
        let response = self
            .authorized(self.http_client.delete(self.rest_url()))
            .query(&[
                ("collection", format!("eq.{}", path)),
                ("id", format!("eq.{}", id)),
            ])
            .send()
            .await?;

        // PostgREST answers 204 whether or not a row matched; tolerate 404 too
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_response(response).await.map(|_| ())
    }
}

impl std::fmt::Debug for SupabaseDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseDocumentStore")
            .field("api_url", &self.api_url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}
