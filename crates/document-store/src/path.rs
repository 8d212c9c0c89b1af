//! Hierarchical collection addresses.

use serde::{Deserialize, Serialize};
use strain_types::UserId;

/// Address of a document collection, e.g. `my-app/users/u1/strains`.
///
/// A single document lives at `{collection}/{id}`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// `{app_id}/users/{user}/strains`: one identity's private reviews.
    pub fn private_strains(app_id: &str, user: &UserId) -> Self {
        Self(format!("{}/users/{}/strains", app_id, user))
    }

    /// `{app_id}/public/data/community_strains`: the shared mirror collection.
    pub fn community_strains(app_id: &str) -> Self {
        Self(format!("{}/public/data/community_strains", app_id))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full path of one document in this collection.
    pub fn document(&self, id: &str) -> String {
        format!("{}/{}", self.0, id)
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_and_public_layouts() {
        let user = UserId::from("u1");
        assert_eq!(
            CollectionPath::private_strains("app", &user).as_str(),
            "app/users/u1/strains"
        );
        assert_eq!(
            CollectionPath::community_strains("app").document("doc-1"),
            "app/public/data/community_strains/doc-1"
        );
    }
}
