//! State-level legal status lookup.
//!
//! A static snapshot (early 2024) of US states and DC. It is informational
//! only and is not refreshed from any source.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LegalStatus {
    Recreational,
    MedicalOnly,
    LimitedCbd,
    Illegal,
}

impl LegalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LegalStatus::Recreational => "Recreational & medical",
            LegalStatus::MedicalOnly => "Medical only",
            LegalStatus::LimitedCbd => "Limited (low-THC / CBD only)",
            LegalStatus::Illegal => "Fully illegal",
        }
    }
}

impl std::fmt::Display for LegalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateLegality {
    pub code: &'static str,
    pub name: &'static str,
    pub status: LegalStatus,
}

const fn state(code: &'static str, name: &'static str, status: LegalStatus) -> StateLegality {
    StateLegality { code, name, status }
}

use LegalStatus::{Illegal, LimitedCbd, MedicalOnly, Recreational};

/// Every state plus DC, alphabetical by name.
pub const STATES: &[StateLegality] = &[
    state("AL", "Alabama", MedicalOnly),
    state("AK", "Alaska", Recreational),
    state("AZ", "Arizona", Recreational),
    state("AR", "Arkansas", MedicalOnly),
    state("CA", "California", Recreational),
    state("CO", "Colorado", Recreational),
    state("CT", "Connecticut", Recreational),
    state("DE", "Delaware", Recreational),
    state("DC", "District of Columbia", Recreational),
    state("FL", "Florida", MedicalOnly),
    state("GA", "Georgia", LimitedCbd),
    state("HI", "Hawaii", MedicalOnly),
    state("ID", "Idaho", Illegal),
    state("IL", "Illinois", Recreational),
    state("IN", "Indiana", LimitedCbd),
    state("IA", "Iowa", LimitedCbd),
    state("KS", "Kansas", Illegal),
    state("KY", "Kentucky", MedicalOnly),
    state("LA", "Louisiana", MedicalOnly),
    state("ME", "Maine", Recreational),
    state("MD", "Maryland", Recreational),
    state("MA", "Massachusetts", Recreational),
    state("MI", "Michigan", Recreational),
    state("MN", "Minnesota", Recreational),
    state("MS", "Mississippi", MedicalOnly),
    state("MO", "Missouri", Recreational),
    state("MT", "Montana", Recreational),
    state("NE", "Nebraska", Illegal),
    state("NV", "Nevada", Recreational),
    state("NH", "New Hampshire", MedicalOnly),
    state("NJ", "New Jersey", Recreational),
    state("NM", "New Mexico", Recreational),
    state("NY", "New York", Recreational),
    state("NC", "North Carolina", LimitedCbd),
    state("ND", "North Dakota", MedicalOnly),
    state("OH", "Ohio", Recreational),
    state("OK", "Oklahoma", MedicalOnly),
    state("OR", "Oregon", Recreational),
    state("PA", "Pennsylvania", MedicalOnly),
    state("RI", "Rhode Island", Recreational),
    state("SC", "South Carolina", LimitedCbd),
    state("SD", "South Dakota", MedicalOnly),
    state("TN", "Tennessee", LimitedCbd),
    state("TX", "Texas", LimitedCbd),
    state("UT", "Utah", MedicalOnly),
    state("VT", "Vermont", Recreational),
    state("VA", "Virginia", Recreational),
    state("WA", "Washington", Recreational),
    state("WV", "West Virginia", MedicalOnly),
    state("WI", "Wisconsin", LimitedCbd),
    state("WY", "Wyoming", LimitedCbd),
];

/// Finds a state by two-letter code or full name, ignoring case.
pub fn lookup(query: &str) -> Option<&'static StateLegality> {
    let query = query.trim();
    STATES
        .iter()
        .find(|s| s.code.eq_ignore_ascii_case(query) || s.name.eq_ignore_ascii_case(query))
}

/// States with the given status, alphabetical.
pub fn states_with(status: LegalStatus) -> impl Iterator<Item = &'static StateLegality> {
    STATES.iter().filter(move |s| s.status == status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn covers_fifty_states_and_dc_once() {
        assert_eq!(STATES.len(), 51);
        let codes: HashSet<&str> = STATES.iter().map(|s| s.code).collect();
        assert_eq!(codes.len(), 51);
    }

    #[test]
    fn lookup_by_code_or_name() {
        assert_eq!(lookup("ca").unwrap().status, LegalStatus::Recreational);
        assert_eq!(lookup(" new york ").unwrap().code, "NY");
        assert_eq!(lookup("Idaho").unwrap().status, LegalStatus::Illegal);
        assert!(lookup("Puerto Rico").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn status_counts() {
        assert_eq!(states_with(LegalStatus::Recreational).count(), 25);
        assert_eq!(states_with(LegalStatus::MedicalOnly).count(), 14);
        assert_eq!(states_with(LegalStatus::LimitedCbd).count(), 9);
        assert_eq!(states_with(LegalStatus::Illegal).count(), 3);
    }
}
