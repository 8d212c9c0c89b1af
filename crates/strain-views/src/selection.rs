//! Tag pickers for the review form.

use serde::Serialize;
use strain_types::{Effect, Terpene, MAX_TERPENES};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("at most {max} terpenes can be selected")]
    TooManyTerpenes { max: usize },
}

/// Ordered terpene picks, capped at [`MAX_TERPENES`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TerpeneSelection(Vec<Terpene>);

impl TerpeneSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a selection by toggling each tag in turn.
    pub fn from_tags(tags: impl IntoIterator<Item = Terpene>) -> Result<Self, SelectionError> {
        let mut selection = Self::new();
        for tag in tags {
            if !selection.contains(tag) {
                selection.toggle(tag)?;
            }
        }
        Ok(selection)
    }

    /// Wraps stored tags without enforcing the cap.
    pub(crate) fn from_stored(tags: &[Terpene]) -> Self {
        Self(tags.to_vec())
    }

    /// Deselects `tag` if selected, otherwise appends it.
    ///
    /// Adding beyond the cap is rejected and leaves the selection unchanged.
    pub fn toggle(&mut self, tag: Terpene) -> Result<(), SelectionError> {
        if let Some(pos) = self.0.iter().position(|t| *t == tag) {
            self.0.remove(pos);
            return Ok(());
        }
        if self.0.len() >= MAX_TERPENES {
            return Err(SelectionError::TooManyTerpenes { max: MAX_TERPENES });
        }
        self.0.push(tag);
        Ok(())
    }

    pub fn contains(&self, tag: Terpene) -> bool {
        self.0.contains(&tag)
    }

    pub fn as_slice(&self) -> &[Terpene] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Ordered effect picks, uncapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EffectSelection(Vec<Effect>);

impl EffectSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tags(tags: impl IntoIterator<Item = Effect>) -> Self {
        let mut selection = Self::new();
        for tag in tags {
            if !selection.contains(tag) {
                selection.0.push(tag);
            }
        }
        selection
    }

    /// Flips `tag`; returns whether it is selected afterwards.
    pub fn toggle(&mut self, tag: Effect) -> bool {
        match self.0.iter().position(|t| *t == tag) {
            Some(pos) => {
                self.0.remove(pos);
                false
            }
            None => {
                self.0.push(tag);
                true
            }
        }
    }

    pub fn contains(&self, tag: Effect) -> bool {
        self.0.contains(&tag)
    }

    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourth_terpene_is_rejected_without_change() {
        let mut selection =
            TerpeneSelection::from_tags([Terpene::Myrcene, Terpene::Limonene, Terpene::Pinene]).unwrap();
        let before = selection.clone();

        assert_eq!(
            selection.toggle(Terpene::Linalool),
            Err(SelectionError::TooManyTerpenes { max: 3 })
        );
        assert_eq!(selection, before);
    }

    #[test]
    fn toggling_selected_terpene_frees_a_slot() {
        let mut selection =
            TerpeneSelection::from_tags([Terpene::Myrcene, Terpene::Limonene, Terpene::Pinene]).unwrap();
        selection.toggle(Terpene::Limonene).unwrap();
        selection.toggle(Terpene::Linalool).unwrap();
        assert_eq!(
            selection.as_slice(),
            &[Terpene::Myrcene, Terpene::Pinene, Terpene::Linalool]
        );
    }

    #[test]
    fn from_tags_rejects_more_than_three() {
        let result = TerpeneSelection::from_tags([
            Terpene::Myrcene,
            Terpene::Limonene,
            Terpene::Pinene,
            Terpene::Humulene,
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn effects_keep_insertion_order() {
        let mut selection = EffectSelection::from_tags([Effect::Sleepy, Effect::Happy, Effect::Sleepy]);
        assert_eq!(selection.as_slice(), &[Effect::Sleepy, Effect::Happy]);

        assert!(!selection.toggle(Effect::Sleepy));
        assert!(selection.toggle(Effect::Giggly));
        assert_eq!(selection.as_slice(), &[Effect::Happy, Effect::Giggly]);
    }
}
