//! Read-only admin listing of community contributions.
//!
//! Gated on the placeholder [`Role`]; there are no moderation actions.

use std::collections::HashSet;

use serde::Serialize;
use strain_types::{CommunityStrainEntry, Role};

use crate::derive::average_rating;

#[derive(Debug, Clone, Serialize)]
pub struct AdminOverview {
    pub total_entries: usize,
    pub contributors: usize,
    pub average_rating: f64,
    /// Newest contributions first.
    pub recent: Vec<CommunityStrainEntry>,
}

impl AdminOverview {
    /// `None` unless `role` is privileged.
    pub fn build(role: Option<Role>, community: &[CommunityStrainEntry]) -> Option<Self> {
        if !role.is_some_and(|role| role.is_privileged()) {
            return None;
        }

        let contributors: HashSet<&str> = community.iter().map(|e| e.user_id.as_str()).collect();
        let mut recent = community.to_vec();
        recent.sort_by(|a, b| b.contributed_at.cmp(&a.contributed_at));

        Some(Self {
            total_entries: community.len(),
            contributors: contributors.len(),
            average_rating: average_rating(community),
            recent,
        })
    }
}
