//! Review form state and its validation.

use strain_types::{
    NewStrainEntry, ProductType, StrainFields, StrainType, StrainUpdate, MAX_RATING, MAX_TERPENES,
};
use thiserror::Error;

use crate::selection::{EffectSelection, TerpeneSelection};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DraftError {
    #[error("strain name is required")]
    MissingName,

    #[error("rating must be between 0 and {max}, got {0}", max = MAX_RATING)]
    RatingOutOfRange(u8),

    #[error("cost must be a non-negative number, got {0:?}")]
    InvalidCost(String),

    #[error("at most {max} terpenes allowed, got {0}", max = MAX_TERPENES)]
    TooManyTerpenes(usize),
}

/// What the add/edit form holds. Text inputs stay text until validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrainDraft {
    pub strain_name: String,
    pub product_type: ProductType,
    pub strain_type: StrainType,
    pub brand: String,
    pub purchased_location: String,
    pub cost: String,
    pub rating: u8,
    pub effects: EffectSelection,
    pub terpenes: TerpeneSelection,
}

impl StrainDraft {
    /// Prefills an edit form from a stored review.
    pub fn from_entry(fields: &StrainFields) -> Self {
        Self {
            strain_name: fields.strain_name.clone(),
            product_type: fields.product_type,
            strain_type: fields.strain_type,
            brand: fields.brand.clone().unwrap_or_default(),
            purchased_location: fields.purchased_location.clone().unwrap_or_default(),
            cost: fields.cost.map(|cost| cost.to_string()).unwrap_or_default(),
            rating: fields.rating,
            effects: EffectSelection::from_tags(fields.effects.iter().copied()),
            terpenes: TerpeneSelection::from_stored(&fields.terpenes),
        }
    }

    /// Checks the draft and produces the candidate review.
    pub fn validate(&self) -> Result<NewStrainEntry, DraftError> {
        let strain_name = self.strain_name.trim();
        if strain_name.is_empty() {
            return Err(DraftError::MissingName);
        }
        if self.rating > MAX_RATING {
            return Err(DraftError::RatingOutOfRange(self.rating));
        }
        if self.terpenes.len() > MAX_TERPENES {
            return Err(DraftError::TooManyTerpenes(self.terpenes.len()));
        }

        Ok(StrainFields {
            strain_name: strain_name.to_string(),
            product_type: self.product_type,
            strain_type: self.strain_type,
            brand: non_empty(&self.brand),
            purchased_location: non_empty(&self.purchased_location),
            cost: parse_cost(&self.cost)?,
            rating: self.rating,
            effects: self.effects.as_slice().to_vec(),
            terpenes: self.terpenes.as_slice().to_vec(),
        })
    }

    /// The complete field set for saving an edit form.
    pub fn to_update(&self) -> Result<StrainUpdate, DraftError> {
        self.validate().map(StrainUpdate::replace_all)
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_cost(text: &str) -> Result<Option<f64>, DraftError> {
    let trimmed = text.trim().trim_start_matches('$');
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(cost) if cost.is_finite() && cost >= 0.0 => Ok(Some(cost)),
        _ => Err(DraftError::InvalidCost(text.to_string())),
    }
}
