//! Output formatting for the CLI.

use clap::ValueEnum;
use serde::Serialize;
use strain_types::{EntryId, StrainRecord};
use strain_views::{DerivedView, StrainSummary};

/// Output format.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message.
pub fn print_success(message: &str, format: &OutputFormat) {
    match format {
        OutputFormat::Text => println!("{}", message),
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "status": "success", "message": message }));
        }
    }
}

/// Print a labelled value.
pub fn print_row(label: &str, value: &str) {
    println!("  {:<16} {}", format!("{}:", label), value);
}

/// Print a divider line.
pub fn print_divider() {
    println!("{}", "-".repeat(78));
}

/// Print a heading.
pub fn print_heading(text: &str) {
    println!("\n{}", text);
    print_divider();
}

/// A record as printed in JSON output. Stored records do not carry their
/// id, so it is added back here.
#[derive(Serialize)]
struct Row<'a, R: Serialize> {
    id: &'a EntryId,
    #[serde(flatten)]
    record: &'a R,
}

#[derive(Serialize)]
struct ViewOutput<'a, R: Serialize> {
    scope: String,
    total: usize,
    average_rating: f64,
    rows: Vec<Row<'a, R>>,
}

/// Print a derived list view in the given format.
pub fn print_view<R>(view: &DerivedView<R>, format: &OutputFormat) -> anyhow::Result<()>
where
    R: StrainRecord + Serialize,
{
    match format {
        OutputFormat::Json => print_json(&ViewOutput {
            scope: view.scope.to_string(),
            total: view.total,
            average_rating: view.average_rating,
            rows: view
                .rows
                .iter()
                .map(|record| Row {
                    id: record.entry_id(),
                    record,
                })
                .collect(),
        }),
        OutputFormat::Text => {
            println!(
                "{} ({} shown of {}, average rating {:.1})",
                view.scope,
                view.rows.len(),
                view.total,
                view.average_rating
            );
            if view.rows.is_empty() {
                println!("No strains found");
                return Ok(());
            }
            println!(
                "{:<36} {:<24} {:<8} {:<12} {:<6} {}",
                "ID", "Strain", "Type", "Product", "Rating", "Effects"
            );
            print_divider();
            for record in &view.rows {
                let fields = record.strain();
                let effects: Vec<&str> = fields.effects.iter().map(|e| e.as_str()).collect();
                println!(
                    "{:<36} {:<24} {:<8} {:<12} {:<6} {}",
                    record.entry_id().as_str(),
                    truncate(&fields.strain_name, 24),
                    fields.strain_type.as_str(),
                    fields.product_type.as_str(),
                    stars(fields.rating),
                    effects.join(", ")
                );
            }
            Ok(())
        }
    }
}

/// Print per-strain summaries.
pub fn print_summaries(summaries: &[StrainSummary], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("No strains reviewed yet");
                return Ok(());
            }
            println!("{:<28} {:<8} {:<8} {}", "Strain", "Reviews", "Average", "Top effects");
            print_divider();
            for summary in summaries {
                let effects: Vec<&str> = summary.top_effects.iter().map(|e| e.as_str()).collect();
                println!(
                    "{:<28} {:<8} {:<8.1} {}",
                    truncate(&summary.name, 28),
                    summary.reviews,
                    summary.average_rating,
                    effects.join(", ")
                );
            }
            Ok(())
        }
    }
}

fn stars(rating: u8) -> String {
    "*".repeat(usize::from(rating))
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("OG Kush", 24), "OG Kush");
    }

    #[test]
    fn truncate_marks_cut_text() {
        let cut = truncate("Granddaddy Purple Platinum Reserve", 12);
        assert_eq!(cut, "Granddadd...");
        assert_eq!(cut.chars().count(), 12);
    }

    #[test]
    fn stars_match_rating() {
        assert_eq!(stars(0), "");
        assert_eq!(stars(3), "***");
    }
}
