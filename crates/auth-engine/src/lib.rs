//! # Auth engine
//!
//! Identity bootstrap for Strainlog.
//!
//! On startup the [`SessionManager`] signs in with an externally supplied
//! token when there is one, falls back to an anonymous identity when there
//! isn't or when the token is refused, and then publishes a ready
//! [`SessionState`]. The backend is abstracted by [`AuthBackend`];
//! [`SupabaseAuthClient`] talks to Supabase Auth over REST.

mod backend;
pub mod bootstrap_fsm;
mod error;
mod identity;
mod session;
mod supabase_client;

pub use backend::AuthBackend;
pub use bootstrap_fsm::BootstrapPhase;
pub use error::{AuthError, AuthResult};
pub use identity::Identity;
pub use strain_types::{Role, PRIVILEGED_ID_PREFIX};
pub use session::{SessionManager, SessionState};
pub use supabase_client::SupabaseAuthClient;
