//! Filtering, sorting and the average rating.
//!
//! Everything here is pure and synchronous; callers re-run it whenever a
//! snapshot or the filter state changes.

use serde::Serialize;
use strain_types::{Effect, StrainFields, StrainRecord, StrainType, Terpene};

/// Which collection feeds a view. The two are never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Private,
    Community,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Private => f.write_str("my strains"),
            Scope::Community => f.write_str("community"),
        }
    }
}

/// Mean rating rounded to one decimal; 0 for an empty list.
pub fn average_rating<R: StrainRecord>(records: &[R]) -> f64 {
    mean_rating(records.iter().map(|record| record.strain().rating))
}

pub(crate) fn mean_rating(ratings: impl Iterator<Item = u8>) -> f64 {
    let (sum, count) = ratings.fold((0u64, 0u64), |(sum, count), rating| {
        (sum + u64::from(rating), count + 1)
    });
    if count == 0 {
        return 0.0;
    }
    round_one_decimal(sum as f64 / count as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Active filter state. Every set field must match; empty fields match all.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrainFilter {
    /// 0 disables the rating threshold.
    pub min_rating: u8,
    pub effect: Option<Effect>,
    /// Case-insensitive substring of the brand.
    pub brand: String,
    pub strain_type: Option<StrainType>,
    pub terpene: Option<Terpene>,
    /// Case-insensitive substring of the strain name.
    pub search: String,
}

impl StrainFilter {
    pub fn matches(&self, fields: &StrainFields) -> bool {
        (self.min_rating == 0 || fields.rating >= self.min_rating)
            && self.effect.map_or(true, |effect| fields.effects.contains(&effect))
            && (self.brand.is_empty()
                || fields
                    .brand
                    .as_deref()
                    .is_some_and(|brand| contains_ignore_case(brand, &self.brand)))
            && self.strain_type.map_or(true, |t| fields.strain_type == t)
            && self.terpene.map_or(true, |terpene| fields.terpenes.contains(&terpene))
            && (self.search.is_empty() || contains_ignore_case(&fields.strain_name, &self.search))
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Records matching `filter`, highest rating first.
///
/// Ties keep their input order, but snapshot order is itself unspecified,
/// so callers must not rely on the order among equal ratings.
pub fn filter_and_sort<R: StrainRecord + Clone>(records: &[R], filter: &StrainFilter) -> Vec<R> {
    let mut matched: Vec<R> = records
        .iter()
        .filter(|record| filter.matches(record.strain()))
        .cloned()
        .collect();
    matched.sort_by(|a, b| b.strain().rating.cmp(&a.strain().rating));
    matched
}

/// A rendered list: the filtered rows plus stats over the whole scope.
#[derive(Debug, Clone, Serialize)]
pub struct DerivedView<R> {
    pub scope: Scope,
    pub rows: Vec<R>,
    /// Records in the scope before filtering.
    pub total: usize,
    /// Average over the whole scope, not just the matching rows.
    pub average_rating: f64,
}

impl<R: StrainRecord + Clone> DerivedView<R> {
    pub fn derive(scope: Scope, records: &[R], filter: &StrainFilter) -> Self {
        Self {
            scope,
            rows: filter_and_sort(records, filter),
            total: records.len(),
            average_rating: average_rating(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use strain_types::{EntryId, StrainEntry, UserId};

    fn entry(id: &str, fields: StrainFields) -> StrainEntry {
        let mut entry = StrainEntry::new_for(UserId::from("u1"), fields, Utc::now());
        entry.id = EntryId::from(id);
        entry
    }

    fn names(records: &[StrainEntry]) -> Vec<&str> {
        records.iter().map(|r| r.fields.strain_name.as_str()).collect()
    }

    fn sample() -> Vec<StrainEntry> {
        vec![
            entry(
                "1",
                StrainFields::named("Blue Dream")
                    .with_rating(4)
                    .with_type(StrainType::Sativa)
                    .with_brand("Coastal Farms")
                    .with_effects([Effect::Happy, Effect::Creative])
                    .with_terpenes([Terpene::Myrcene, Terpene::Pinene]),
            ),
            entry(
                "2",
                StrainFields::named("OG Kush")
                    .with_rating(2)
                    .with_type(StrainType::Indica)
                    .with_effects([Effect::Sleepy])
                    .with_terpenes([Terpene::Limonene]),
            ),
            entry(
                "3",
                StrainFields::named("Granddaddy Purple")
                    .with_rating(5)
                    .with_type(StrainType::Indica)
                    .with_brand("Purple Co")
                    .with_effects([Effect::Sleepy, Effect::Relaxed])
                    .with_terpenes([Terpene::Myrcene]),
            ),
            entry("4", StrainFields::named("Unrated Indica").with_type(StrainType::Indica)),
        ]
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(average_rating::<StrainEntry>(&[]), 0.0);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let records = vec![
            entry("a", StrainFields::named("a").with_rating(5)),
            entry("b", StrainFields::named("b").with_rating(4)),
            entry("c", StrainFields::named("c").with_rating(4)),
        ];
        // 13 / 3 = 4.333...
        assert_eq!(average_rating(&records), 4.3);

        let records = vec![
            entry("a", StrainFields::named("a").with_rating(5)),
            entry("b", StrainFields::named("b").with_rating(4)),
            entry("c", StrainFields::named("c").with_rating(5)),
        ];
        // 14 / 3 = 4.666...
        assert_eq!(average_rating(&records), 4.7);
    }

    #[test]
    fn blue_dream_and_og_kush_scenario() {
        let records = vec![
            entry("1", StrainFields::named("Blue Dream").with_rating(4)),
            entry("2", StrainFields::named("OG Kush").with_rating(2)),
        ];
        assert_eq!(average_rating(&records), 3.0);

        let filter = StrainFilter {
            min_rating: 3,
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&records, &filter)), vec!["Blue Dream"]);
    }

    #[test]
    fn empty_filter_keeps_everything_sorted_by_rating() {
        let result = filter_and_sort(&sample(), &StrainFilter::default());
        assert_eq!(
            names(&result),
            vec!["Granddaddy Purple", "Blue Dream", "OG Kush", "Unrated Indica"]
        );
        assert!(result
            .windows(2)
            .all(|pair| pair[0].fields.rating >= pair[1].fields.rating));
    }

    #[test]
    fn filters_are_conjunctive() {
        let filter = StrainFilter {
            min_rating: 3,
            strain_type: Some(StrainType::Indica),
            ..Default::default()
        };
        let result = filter_and_sort(&sample(), &filter);
        assert_eq!(names(&result), vec!["Granddaddy Purple"]);
        assert!(result
            .iter()
            .all(|r| r.fields.rating >= 3 && r.fields.strain_type == StrainType::Indica));
    }

    #[test]
    fn zero_rating_threshold_includes_unrated() {
        let filter = StrainFilter {
            strain_type: Some(StrainType::Indica),
            ..Default::default()
        };
        assert_eq!(filter_and_sort(&sample(), &filter).len(), 3);
    }

    #[test]
    fn tag_filters_use_containment() {
        let by_effect = StrainFilter {
            effect: Some(Effect::Sleepy),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_and_sort(&sample(), &by_effect)),
            vec!["Granddaddy Purple", "OG Kush"]
        );

        let by_terpene = StrainFilter {
            terpene: Some(Terpene::Myrcene),
            ..Default::default()
        };
        assert_eq!(
            names(&filter_and_sort(&sample(), &by_terpene)),
            vec!["Granddaddy Purple", "Blue Dream"]
        );
    }

    #[test]
    fn text_filters_are_case_insensitive_substrings() {
        let by_brand = StrainFilter {
            brand: "coastal".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&sample(), &by_brand)), vec!["Blue Dream"]);

        let by_search = StrainFilter {
            search: "KUSH".to_string(),
            ..Default::default()
        };
        assert_eq!(names(&filter_and_sort(&sample(), &by_search)), vec!["OG Kush"]);
    }

    #[test]
    fn brand_filter_excludes_records_without_brand() {
        let filter = StrainFilter {
            brand: "o".to_string(),
            ..Default::default()
        };
        let result = filter_and_sort(&sample(), &filter);
        assert!(result.iter().all(|r| r.fields.brand.is_some()));
    }

    #[test]
    fn equal_ratings_keep_input_order() {
        let records = vec![
            entry("a", StrainFields::named("First").with_rating(3)),
            entry("b", StrainFields::named("Second").with_rating(3)),
            entry("c", StrainFields::named("Third").with_rating(3)),
        ];
        assert_eq!(
            names(&filter_and_sort(&records, &StrainFilter::default())),
            vec!["First", "Second", "Third"]
        );
    }

    #[test]
    fn derived_view_averages_the_whole_scope() {
        let filter = StrainFilter {
            min_rating: 5,
            ..Default::default()
        };
        let view = DerivedView::derive(Scope::Private, &sample(), &filter);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.total, 4);
        // (4 + 2 + 5 + 0) / 4 = 2.75
        assert_eq!(view.average_rating, 2.8);
    }
}
