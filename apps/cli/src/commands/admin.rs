//! Read-only admin overview.

use anyhow::Result;
use strain_views::AdminOverview;

use super::{connect, first_snapshot, require_identity};
use crate::output::{self, OutputFormat};

/// Show the community overview. Only privileged identities get one.
pub async fn admin(format: &OutputFormat) -> Result<()> {
    let context = connect().await?;
    require_identity(&context)?;

    let subscriptions = context.subscriptions();
    let community = first_snapshot(subscriptions.watch_community()).await;
    subscriptions.shutdown().await;

    let Some(overview) = AdminOverview::build(context.role(), community.as_slice()) else {
        anyhow::bail!("The admin overview requires a privileged identity");
    };

    match format {
        OutputFormat::Json => output::print_json(&overview),
        OutputFormat::Text => {
            output::print_heading("Community overview");
            output::print_row("Entries", &overview.total_entries.to_string());
            output::print_row("Contributors", &overview.contributors.to_string());
            output::print_row("Average rating", &format!("{:.1}", overview.average_rating));

            output::print_heading("Recent contributions");
            for entry in &overview.recent {
                println!(
                    "{:<20} {:<24} {:<6} {}",
                    entry.contributed_at.format("%Y-%m-%d %H:%M").to_string(),
                    entry.fields.strain_name,
                    entry.fields.rating,
                    entry.user_id
                );
            }
            Ok(())
        }
    }
}
