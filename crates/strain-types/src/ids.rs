//! Opaque identifiers.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identity of a signed-in user, as assigned by the auth backend.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Creates a user ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the user ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for UserId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Backend-assigned document id, unique within its collection.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Creates a new random entry ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Placeholder for a record whose id has not been assigned by a store yet.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Creates an entry ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the entry ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns false for [`EntryId::unassigned`].
    pub fn is_assigned(&self) -> bool {
        !self.0.is_empty()
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_new_is_unique() {
        assert_ne!(EntryId::new(), EntryId::new());
    }

    #[test]
    fn unassigned_entry_id() {
        assert!(!EntryId::unassigned().is_assigned());
        assert!(EntryId::from_string("abc").is_assigned());
    }

    #[test]
    fn user_id_display() {
        let id = UserId::from("anon-123");
        assert_eq!(format!("{}", id), "anon-123");
        assert_eq!(id.as_str(), "anon-123");
    }

    #[test]
    fn user_id_serializes_transparently() {
        let json = serde_json::to_string(&UserId::from("u1")).unwrap();
        assert_eq!(json, "\"u1\"");
    }
}
