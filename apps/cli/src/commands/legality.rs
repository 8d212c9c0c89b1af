//! State legality lookup. Works offline.

use anyhow::Result;
use strain_views::legality::{lookup, states_with, LegalStatus, StateLegality, STATES};

use crate::output::{self, OutputFormat};

const STATUS_ORDER: [LegalStatus; 4] = [
    LegalStatus::Recreational,
    LegalStatus::MedicalOnly,
    LegalStatus::LimitedCbd,
    LegalStatus::Illegal,
];

/// Show one state's status, or every state grouped by status.
pub fn legality(query: Option<&str>, format: &OutputFormat) -> Result<()> {
    match query {
        Some(query) => {
            let Some(state) = lookup(query) else {
                anyhow::bail!("Unknown state {:?}. Use a two-letter code or full name", query);
            };
            print_state(state, format)
        }
        None => match format {
            OutputFormat::Json => output::print_json(&STATES),
            OutputFormat::Text => {
                for status in STATUS_ORDER {
                    output::print_heading(status.label());
                    let names: Vec<&str> =
                        states_with(status).map(|state| state.name).collect();
                    println!("{}", names.join(", "));
                }
                Ok(())
            }
        },
    }
}

fn print_state(state: &StateLegality, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => output::print_json(state),
        OutputFormat::Text => {
            output::print_row("State", &format!("{} ({})", state.name, state.code));
            output::print_row("Status", state.status.label());
            Ok(())
        }
    }
}
