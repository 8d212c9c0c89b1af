//! Per-strain and per-effect aggregates over a collection.

use std::collections::HashMap;

use serde::Serialize;
use strain_types::{Effect, StrainRecord};

use crate::derive::mean_rating;

/// How many effects a strain summary lists.
const TOP_EFFECTS: usize = 3;

/// All reviews of one strain name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrainSummary {
    /// Name as first seen in the input.
    pub name: String,
    pub reviews: usize,
    pub average_rating: f64,
    /// Most reported effects, most common first.
    pub top_effects: Vec<Effect>,
}

/// Groups reviews by strain name, ignoring case and surrounding whitespace.
///
/// Ordered by review count, then average rating (both descending), then name.
pub fn aggregate_by_strain<R: StrainRecord>(records: &[R]) -> Vec<StrainSummary> {
    let mut groups: Vec<(String, Vec<&R>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let name = record.strain().strain_name.trim();
        let key = name.to_lowercase();
        match index.get(&key) {
            Some(&slot) => groups[slot].1.push(record),
            None => {
                index.insert(key, groups.len());
                groups.push((name.to_string(), vec![record]));
            }
        }
    }

    let mut summaries: Vec<StrainSummary> = groups
        .into_iter()
        .map(|(name, members)| StrainSummary {
            name,
            reviews: members.len(),
            average_rating: mean_rating(members.iter().map(|r| r.strain().rating)),
            top_effects: effect_frequency(&members)
                .into_iter()
                .take(TOP_EFFECTS)
                .map(|(effect, _)| effect)
                .collect(),
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.reviews
            .cmp(&a.reviews)
            .then_with(|| b.average_rating.total_cmp(&a.average_rating))
            .then_with(|| a.name.cmp(&b.name))
    });
    summaries
}

/// How often each effect is reported, most common first. Ties follow the
/// vocabulary order.
pub fn effect_frequency<R: StrainRecord>(records: &[R]) -> Vec<(Effect, usize)> {
    let mut counts: HashMap<Effect, usize> = HashMap::new();
    for record in records {
        for effect in &record.strain().effects {
            *counts.entry(*effect).or_default() += 1;
        }
    }

    let mut frequency: Vec<(Effect, usize)> = counts.into_iter().collect();
    frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    frequency
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use strain_types::{CommunityStrainEntry, EntryId, StrainEntry, StrainFields, UserId};

    fn mirror(user: &str, fields: StrainFields) -> CommunityStrainEntry {
        let mut entry = StrainEntry::new_for(UserId::from(user), fields, Utc::now());
        entry.id = EntryId::new();
        CommunityStrainEntry::snapshot_of(&entry, Utc::now())
    }

    fn community() -> Vec<CommunityStrainEntry> {
        vec![
            mirror(
                "u1",
                StrainFields::named("Blue Dream")
                    .with_rating(4)
                    .with_effects([Effect::Happy, Effect::Creative]),
            ),
            mirror(
                "u2",
                StrainFields::named("blue dream ")
                    .with_rating(5)
                    .with_effects([Effect::Happy, Effect::Uplifted]),
            ),
            mirror("u3", StrainFields::named("OG Kush").with_rating(5).with_effects([Effect::Sleepy])),
            mirror("u1", StrainFields::named("Gelato").with_rating(3)),
        ]
    }

    #[test]
    fn groups_case_insensitively_and_orders_by_count() {
        let summaries = aggregate_by_strain(&community());
        assert_eq!(summaries.len(), 3);

        assert_eq!(summaries[0].name, "Blue Dream");
        assert_eq!(summaries[0].reviews, 2);
        assert_eq!(summaries[0].average_rating, 4.5);
        assert_eq!(summaries[0].top_effects[0], Effect::Happy);

        // Same count: higher average first
        assert_eq!(summaries[1].name, "OG Kush");
        assert_eq!(summaries[2].name, "Gelato");
    }

    #[test]
    fn effect_frequency_counts_across_records() {
        let frequency = effect_frequency(&community());
        assert_eq!(frequency[0], (Effect::Happy, 2));
        assert_eq!(frequency.len(), 4);
        // Ties in vocabulary order
        assert_eq!(frequency[1].0, Effect::Uplifted);
        assert_eq!(frequency[2].0, Effect::Creative);
        assert_eq!(frequency[3].0, Effect::Sleepy);
    }

    #[test]
    fn empty_input() {
        assert!(aggregate_by_strain::<CommunityStrainEntry>(&[]).is_empty());
        assert!(effect_frequency::<CommunityStrainEntry>(&[]).is_empty());
    }
}
