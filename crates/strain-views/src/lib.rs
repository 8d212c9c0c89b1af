//! # Strain views
//!
//! Pure functions over already-fetched review lists:
//!
//! - filtering, rating-descending sort and the average rating
//! - per-strain and per-effect aggregates
//! - the privileged-only admin listing
//! - form drafts with their tag pickers and validation
//! - a static state legality table
//!
//! ```rust
//! use strain_views::{average_rating, filter_and_sort, StrainFilter};
//! use strain_types::{StrainEntry, StrainFields, UserId};
//!
//! let now = chrono::Utc::now();
//! let list = vec![
//!     StrainEntry::new_for(UserId::from("u1"), StrainFields::named("Blue Dream").with_rating(4), now),
//!     StrainEntry::new_for(UserId::from("u1"), StrainFields::named("OG Kush").with_rating(2), now),
//! ];
//! assert_eq!(average_rating(&list), 3.0);
//!
//! let filter = StrainFilter { min_rating: 3, ..Default::default() };
//! assert_eq!(filter_and_sort(&list, &filter).len(), 1);
//! ```

mod admin;
mod aggregate;
mod derive;
mod draft;
pub mod legality;
mod selection;

pub use admin::AdminOverview;
pub use aggregate::{aggregate_by_strain, effect_frequency, StrainSummary};
pub use derive::{average_rating, filter_and_sort, DerivedView, Scope, StrainFilter};
pub use draft::{DraftError, StrainDraft};
pub use legality::{LegalStatus, StateLegality};
pub use selection::{EffectSelection, SelectionError, TerpeneSelection};
