//! # Document store
//!
//! The backend boundary of Strainlog: collections of JSON documents
//! addressed by hierarchical paths, with three operations
//! (`subscribe`, `write_merge`, `delete`) behind the [`DocumentStore`] trait.
//!
//! - [`SupabaseDocumentStore`] talks to a Supabase project over PostgREST.
//! - [`InMemoryDocumentStore`] keeps everything in process.
//!
//! Subscriptions are [`SnapshotStream`]s: each item is the full collection,
//! and cancelling or dropping the stream releases the listener.

mod error;
mod live;
mod memory;
mod path;
mod store;
mod stream;
mod supabase;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryDocumentStore;
pub use path::CollectionPath;
pub use store::{merge_fields, Document, DocumentStore};
pub use stream::{SnapshotEvent, SnapshotStream};
pub use supabase::SupabaseDocumentStore;
