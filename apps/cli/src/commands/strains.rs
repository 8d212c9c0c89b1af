//! Review list and write commands.

use anyhow::Result;
use serde::Serialize;
use strain_types::{EntryId, StrainRecord};
use strain_views::{
    average_rating, DerivedView, EffectSelection, Scope, StrainDraft, StrainFilter,
    TerpeneSelection,
};
use tracing::info;

use super::{connect, first_snapshot, require_identity};
use crate::output::{self, OutputFormat};
use crate::FieldArgs;

/// List the signed-in identity's reviews.
pub async fn list(filter: StrainFilter, format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;

    let subscriptions = context.subscriptions();
    let entries = first_snapshot(subscriptions.watch_private()).await;
    subscriptions.shutdown().await;

    output::print_view(&DerivedView::derive(Scope::Private, entries.as_slice(), &filter), format)
}

/// List community reviews.
pub async fn community(filter: StrainFilter, format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;

    let subscriptions = context.subscriptions();
    let entries = first_snapshot(subscriptions.watch_community()).await;
    subscriptions.shutdown().await;

    output::print_view(&DerivedView::derive(Scope::Community, entries.as_slice(), &filter), format)
}

#[derive(Serialize)]
struct Written<'a> {
    status: &'static str,
    id: &'a str,
}

/// Validate the form and create a review.
pub async fn add(name: String, fields: FieldArgs, format: &OutputFormat) -> Result<()> {
    let mut draft = StrainDraft {
        strain_name: name,
        ..Default::default()
    };
    fields.apply_to(&mut draft)?;
    let candidate = draft.validate()?;

    let context = connect().await?;
    require_identity(&context)?;
    let Some(id) = context.gateway().create(candidate).await else {
        anyhow::bail!("The review was not saved. Check the logs for details");
    };

    info!(entry_id = %id, "Review added");
    match format {
        OutputFormat::Text => println!("Added review {}", id),
        OutputFormat::Json => output::print_json(&Written {
            status: "created",
            id: id.as_str(),
        })?,
    }
    Ok(())
}

/// Prefill the edit form from the stored review, apply the flags and save.
pub async fn update(
    id: &str,
    name: Option<String>,
    fields: FieldArgs,
    format: &OutputFormat,
) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;

    let subscriptions = context.subscriptions();
    let entries = first_snapshot(subscriptions.watch_private()).await;
    subscriptions.shutdown().await;

    let id = EntryId::from(id);
    let Some(stored) = entries.iter().find(|entry| entry.id == id) else {
        anyhow::bail!("No review with id {} in your collection", id);
    };

    let mut draft = StrainDraft::from_entry(&stored.fields);
    if let Some(name) = name {
        draft.strain_name = name;
    }
    fields.apply_to(&mut draft)?;
    let update = draft.to_update()?;

    if !context.gateway().update(&id, update).await {
        anyhow::bail!("The review was not updated. Check the logs for details");
    }
    output::print_success(&format!("Updated review {}", id), format);
    Ok(())
}

/// Delete a private review. The community copy is left in place.
pub async fn delete(id: &str, format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;
    let id = EntryId::from(id);
    if !context.gateway().delete(&id).await {
        anyhow::bail!("The review was not deleted. Check the logs for details");
    }
    output::print_success(&format!("Deleted review {}", id), format);
    Ok(())
}

#[derive(Serialize)]
struct SnapshotLine {
    scope: Scope,
    count: usize,
    average_rating: f64,
}

/// Print a summary line for every snapshot until interrupted.
pub async fn watch(community: bool, format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;
    let subscriptions = context.subscriptions();

    if community {
        follow(Scope::Community, subscriptions.watch_community(), format).await?;
    } else {
        follow(Scope::Private, subscriptions.watch_private(), format).await?;
    }

    subscriptions.shutdown().await;
    Ok(())
}

async fn follow<R: StrainRecord>(
    scope: Scope,
    mut rx: tokio::sync::watch::Receiver<strain_sync::SharedList<R>>,
    format: &OutputFormat,
) -> Result<()> {
    if let OutputFormat::Text = format {
        println!("Watching {}. Press Ctrl-C to stop.", scope);
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = {
                    let entries = rx.borrow_and_update();
                    SnapshotLine {
                        scope,
                        count: entries.len(),
                        average_rating: average_rating(entries.as_slice()),
                    }
                };
                match format {
                    OutputFormat::Text => println!(
                        "{}: {} reviews, average rating {:.1}",
                        line.scope, line.count, line.average_rating
                    ),
                    OutputFormat::Json => println!("{}", serde_json::to_string(&line)?),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

impl FieldArgs {
    /// Overwrite the draft with every flag that was given.
    pub(crate) fn apply_to(self, draft: &mut StrainDraft) -> Result<()> {
        if let Some(product_type) = self.product {
            draft.product_type = product_type;
        }
        if let Some(strain_type) = self.strain_type {
            draft.strain_type = strain_type;
        }
        if let Some(brand) = self.brand {
            draft.brand = brand;
        }
        if let Some(location) = self.location {
            draft.purchased_location = location;
        }
        if let Some(cost) = self.cost {
            draft.cost = cost;
        }
        if let Some(rating) = self.rating {
            draft.rating = rating;
        }
        if !self.effects.is_empty() {
            draft.effects = EffectSelection::from_tags(self.effects);
        }
        if !self.terpenes.is_empty() {
            draft.terpenes = TerpeneSelection::from_tags(self.terpenes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strain_types::{Effect, StrainFields, StrainType, Terpene};

    fn no_flags() -> FieldArgs {
        FieldArgs {
            product: None,
            strain_type: None,
            brand: None,
            location: None,
            cost: None,
            rating: None,
            effects: Vec::new(),
            terpenes: Vec::new(),
        }
    }

    #[test]
    fn unset_flags_keep_the_prefilled_form() {
        let stored = StrainFields::named("Gelato")
            .with_rating(3)
            .with_brand("Cookies")
            .with_effects([Effect::Relaxed]);
        let mut draft = StrainDraft::from_entry(&stored);

        no_flags().apply_to(&mut draft).unwrap();
        assert_eq!(draft.validate().unwrap(), stored);
    }

    #[test]
    fn given_flags_overwrite_and_empty_text_clears() {
        let stored = StrainFields::named("Gelato").with_rating(3).with_brand("Cookies");
        let mut draft = StrainDraft::from_entry(&stored);

        FieldArgs {
            strain_type: Some(StrainType::Indica),
            brand: Some(String::new()),
            rating: Some(5),
            effects: vec![Effect::Sleepy],
            ..no_flags()
        }
        .apply_to(&mut draft)
        .unwrap();

        let fields = draft.validate().unwrap();
        assert_eq!(fields.strain_type, StrainType::Indica);
        assert_eq!(fields.brand, None);
        assert_eq!(fields.rating, 5);
        assert_eq!(fields.effects, vec![Effect::Sleepy]);
    }

    #[test]
    fn too_many_terpene_flags_fail() {
        let mut draft = StrainDraft::default();
        let result = FieldArgs {
            terpenes: vec![
                Terpene::Myrcene,
                Terpene::Pinene,
                Terpene::Limonene,
                Terpene::Linalool,
            ],
            ..no_flags()
        }
        .apply_to(&mut draft);
        assert!(result.is_err());
    }
}
