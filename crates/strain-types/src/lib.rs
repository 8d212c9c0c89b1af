//! # Strain types
//!
//! Record types shared by every layer of Strainlog: the review a user keeps
//! in their private collection, the community mirror written alongside it,
//! and the fixed tag vocabularies both draw from.
//!
//! ## Wire shape
//!
//! Records are stored as camelCase JSON objects. The document id is not part
//! of the stored object; it is attached when a record is decoded from a
//! collection snapshot.
//!
//! ```rust
//! use strain_types::{StrainEntry, StrainFields, UserId};
//!
//! let fields = StrainFields::named("Blue Dream").with_rating(4);
//! let entry = StrainEntry::new_for(UserId::from("user-1"), fields, chrono::Utc::now());
//! let data = entry.to_json();
//! assert_eq!(data["strainName"], "Blue Dream");
//! assert!(data.get("id").is_none());
//! ```

mod entry;
mod ids;
mod role;
mod vocabulary;

pub use entry::{
    CommunityStrainEntry, NewStrainEntry, StrainEntry, StrainFields, StrainRecord, StrainUpdate,
    MAX_RATING, MAX_TERPENES,
};
pub use ids::{EntryId, UserId};
pub use role::{Role, PRIVILEGED_ID_PREFIX};
pub use vocabulary::{Effect, ProductType, StrainType, Terpene};
