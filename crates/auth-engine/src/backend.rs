//! The auth capability the session manager consumes.

use crate::{AuthResult, Identity};
use async_trait::async_trait;

/// Backend that can turn a token, or nothing, into an identity.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Establishes the identity that owns an externally supplied token.
    async fn sign_in_with_token(&self, token: &str) -> AuthResult<Identity>;

    /// Creates a fresh anonymous identity.
    async fn sign_in_anonymously(&self) -> AuthResult<Identity>;
}
