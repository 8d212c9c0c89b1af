//! The placeholder role scheme.

use serde::Serialize;

use crate::UserId;

/// Ids starting with this literal are treated as privileged.
///
/// This is a placeholder. It grants nothing on the backend and anyone who
/// controls their id string controls their role.
pub const PRIVILEGED_ID_PREFIX: &str = "admin_";

/// Role derived from an identity's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Privileged,
}

impl Role {
    pub fn for_user(user_id: &UserId) -> Self {
        if user_id.as_str().starts_with(PRIVILEGED_ID_PREFIX) {
            Role::Privileged
        } else {
            Role::Member
        }
    }

    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Privileged)
    }
}
