//! Aggregate statistics over a collection.

use anyhow::Result;
use serde::Serialize;
use strain_types::Effect;
use strain_views::{aggregate_by_strain, average_rating, effect_frequency, Scope, StrainSummary};

use super::{connect, first_snapshot, require_identity};
use crate::output::{self, OutputFormat};

#[derive(Serialize)]
struct EffectCount {
    effect: Effect,
    reviews: usize,
}

#[derive(Serialize)]
struct Stats {
    scope: Scope,
    total: usize,
    average_rating: f64,
    strains: Vec<StrainSummary>,
    effects: Vec<EffectCount>,
}

/// Show per-strain and per-effect statistics.
pub async fn stats(community: bool, format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;
    let subscriptions = context.subscriptions();

    let stats = if community {
        let entries = first_snapshot(subscriptions.watch_community()).await;
        build(Scope::Community, entries.as_slice())
    } else {
        let entries = first_snapshot(subscriptions.watch_private()).await;
        build(Scope::Private, entries.as_slice())
    };
    subscriptions.shutdown().await;

    match format {
        OutputFormat::Json => output::print_json(&stats),
        OutputFormat::Text => {
            output::print_heading(&format!("Statistics for {}", stats.scope));
            output::print_row("Reviews", &stats.total.to_string());
            output::print_row("Average rating", &format!("{:.1}", stats.average_rating));

            output::print_heading("By strain");
            output::print_summaries(&stats.strains, format)?;

            output::print_heading("By effect");
            if stats.effects.is_empty() {
                println!("No effects reported yet");
            }
            for count in &stats.effects {
                output::print_row(count.effect.as_str(), &count.reviews.to_string());
            }
            Ok(())
        }
    }
}

fn build<R: strain_types::StrainRecord>(scope: Scope, records: &[R]) -> Stats {
    Stats {
        scope,
        total: records.len(),
        average_rating: average_rating(records),
        strains: aggregate_by_strain(records),
        effects: effect_frequency(records)
            .into_iter()
            .map(|(effect, reviews)| EffectCount { effect, reviews })
            .collect(),
    }
}
