//! Resolved identities.

use strain_types::{Role, UserId};

/// An identity established by the auth backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    /// Bearer token for backend calls made on behalf of this identity.
    pub access_token: Option<String>,
    pub anonymous: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<UserId>, access_token: Option<String>, anonymous: bool) -> Self {
        Self {
            user_id: user_id.into(),
            access_token,
            anonymous,
        }
    }

    /// Placeholder role derived from the id prefix.
    pub fn role(&self) -> Role {
        Role::for_user(&self.user_id)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("anonymous", &self.anonymous)
            .field("has_access_token", &self.access_token.is_some())
            .finish()
    }
}
