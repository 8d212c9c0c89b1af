//! # Strain sync
//!
//! Keeps the two collections a Strainlog client works with in memory and
//! writes changes back:
//!
//! - [`CollectionSubscriptions`]: the identity's private reviews and the
//!   shared community mirrors, each a live, fully replaced snapshot.
//! - [`MutationGateway`]: create, update and delete on private reviews,
//!   with a best-effort community mirror written on create.
//! - [`SessionContext`]: the owned object that wires session and store
//!   into both.
//!
//! Writes are never echoed locally. A caller sees the effect of a write
//! when a later snapshot contains it.

mod context;
mod gateway;
mod subscriptions;

pub use context::SessionContext;
pub use gateway::MutationGateway;
pub use subscriptions::{CollectionSubscriptions, SharedList};
