//! Strain review records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::{EntryId, UserId};
use crate::vocabulary::{Effect, ProductType, StrainType, Terpene};

/// Highest rating a review can carry. 0 means unrated.
pub const MAX_RATING: u8 = 5;

/// Input-layer cap on terpene tags per review. Storage does not enforce it.
pub const MAX_TERPENES: usize = 3;

/// The user-editable part of a review.
///
/// Decoding is lenient: any missing field falls back to its default so a
/// record written by a partial upsert still decodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrainFields {
    pub strain_name: String,
    pub product_type: ProductType,
    #[serde(rename = "type")]
    pub strain_type: StrainType,
    pub brand: Option<String>,
    pub purchased_location: Option<String>,
    pub cost: Option<f64>,
    pub rating: u8,
    /// Insertion order is kept for display; matching ignores it.
    pub effects: Vec<Effect>,
    pub terpenes: Vec<Terpene>,
}

/// A candidate review before it has an id, owner or timestamps.
pub type NewStrainEntry = StrainFields;

impl StrainFields {
    /// Creates fields for a named strain with every other field defaulted.
    pub fn named(strain_name: impl Into<String>) -> Self {
        Self {
            strain_name: strain_name.into(),
            ..Default::default()
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_type(mut self, strain_type: StrainType) -> Self {
        self.strain_type = strain_type;
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects = effects.into_iter().collect();
        self
    }

    pub fn with_terpenes(mut self, terpenes: impl IntoIterator<Item = Terpene>) -> Self {
        self.terpenes = terpenes.into_iter().collect();
        self
    }

    /// Serializes the fields as a JSON object.
    pub fn to_json(&self) -> Map<String, Value> {
        into_object(serde_json::to_value(self))
    }
}

/// Read access shared by private entries and community mirrors.
pub trait StrainRecord {
    fn entry_id(&self) -> &EntryId;
    fn strain(&self) -> &StrainFields;
}

impl<T: StrainRecord + ?Sized> StrainRecord for &T {
    fn entry_id(&self) -> &EntryId {
        (**self).entry_id()
    }

    fn strain(&self) -> &StrainFields {
        (**self).strain()
    }
}

/// A review in a user's private collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainEntry {
    #[serde(skip, default = "EntryId::unassigned")]
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: StrainFields,
    pub user_id: UserId,
    /// Absent on records that were created by an update-upsert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl StrainEntry {
    /// Stamps owner and timestamps onto candidate fields. The id stays
    /// unassigned until a store assigns one.
    pub fn new_for(user_id: UserId, fields: StrainFields, now: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::unassigned(),
            fields,
            user_id,
            created_at: Some(now),
            updated_at: now,
        }
    }

    /// Decodes a stored document and attaches its id.
    pub fn from_json(id: impl Into<EntryId>, data: Value) -> Result<Self, serde_json::Error> {
        let mut entry: StrainEntry = serde_json::from_value(data)?;
        entry.id = id.into();
        Ok(entry)
    }

    /// Encodes the stored object (without the id).
    pub fn to_json(&self) -> Map<String, Value> {
        into_object(serde_json::to_value(self))
    }
}

impl StrainRecord for StrainEntry {
    fn entry_id(&self) -> &EntryId {
        &self.id
    }

    fn strain(&self) -> &StrainFields {
        &self.fields
    }
}

/// Point-in-time copy of a private review, shared with every identity.
///
/// Written once when the private review is created and never resynchronized:
/// later edits or deletion of the private review do not reach it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStrainEntry {
    #[serde(skip, default = "EntryId::unassigned")]
    pub id: EntryId,
    #[serde(flatten)]
    pub fields: StrainFields,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Back-reference to the private record this was copied from.
    pub original_doc_id: EntryId,
    pub contributed_at: DateTime<Utc>,
}

impl CommunityStrainEntry {
    /// Copies every field of `entry`, which must already carry its private id.
    pub fn snapshot_of(entry: &StrainEntry, contributed_at: DateTime<Utc>) -> Self {
        Self {
            id: EntryId::unassigned(),
            fields: entry.fields.clone(),
            user_id: entry.user_id.clone(),
            created_at: entry.created_at,
            updated_at: Some(entry.updated_at),
            original_doc_id: entry.id.clone(),
            contributed_at,
        }
    }

    pub fn from_json(id: impl Into<EntryId>, data: Value) -> Result<Self, serde_json::Error> {
        let mut entry: CommunityStrainEntry = serde_json::from_value(data)?;
        entry.id = id.into();
        Ok(entry)
    }

    pub fn to_json(&self) -> Map<String, Value> {
        into_object(serde_json::to_value(self))
    }
}

impl StrainRecord for CommunityStrainEntry {
    fn entry_id(&self) -> &EntryId {
        &self.id
    }

    fn strain(&self) -> &StrainFields {
        &self.fields
    }
}

/// A partial or complete field set for merge-writing onto a private review.
///
/// `None` leaves the stored value alone. For the optional text and cost
/// fields, `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub strain_type: Option<StrainType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchased_location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<Effect>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terpenes: Option<Vec<Terpene>>,
}

impl StrainUpdate {
    /// An update that overwrites every editable field.
    pub fn replace_all(fields: StrainFields) -> Self {
        Self {
            strain_name: Some(fields.strain_name),
            product_type: Some(fields.product_type),
            strain_type: Some(fields.strain_type),
            brand: Some(fields.brand),
            purchased_location: Some(fields.purchased_location),
            cost: Some(fields.cost),
            rating: Some(fields.rating),
            effects: Some(fields.effects),
            terpenes: Some(fields.terpenes),
        }
    }

    pub fn rating(rating: u8) -> Self {
        Self {
            rating: Some(rating),
            ..Default::default()
        }
    }

    pub fn to_json(&self) -> Map<String, Value> {
        into_object(serde_json::to_value(self))
    }
}

/// Struct serialization always yields an object; anything else becomes empty.
fn into_object(value: Result<Value, serde_json::Error>) -> Map<String, Value> {
    match value {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}
