//! Strainlog CLI - track and browse strain reviews from the terminal.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use strain_config_and_utils::{init_logging, Config, Paths};
use strain_types::{Effect, ProductType, StrainType, Terpene};
use strain_views::StrainFilter;

/// Strainlog CLI - keep a private strain journal and browse the community's.
#[derive(Parser)]
#[command(name = "strainlog")]
#[command(about = "Track, rate and browse strain reviews")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error). Defaults to the
    /// configured level.
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List your own reviews
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// List community reviews
    Community {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Add a review (also shared with the community)
    Add {
        /// Strain name
        #[arg(short, long)]
        name: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Edit one of your reviews
    Update {
        /// Review ID
        id: String,

        /// New strain name
        #[arg(short, long)]
        name: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete one of your reviews (the community copy stays)
    Delete {
        /// Review ID
        id: String,
    },

    /// Per-strain and per-effect statistics
    Stats {
        /// Use community reviews instead of your own
        #[arg(long)]
        community: bool,
    },

    /// Look up the legal status of a US state
    Legality {
        /// Two-letter code or full name; omit to list every state
        state: Option<String>,
    },

    /// Overview of community contributions (privileged identities only)
    Admin,

    /// Follow a collection and print every update
    Watch {
        /// Follow community reviews instead of your own
        #[arg(long)]
        community: bool,
    },
}

/// Filter flags shared by the list commands.
#[derive(Args)]
struct FilterArgs {
    /// Minimum rating (0-5)
    #[arg(long, default_value_t = 0)]
    min_rating: u8,

    /// Only reviews reporting this effect
    #[arg(long, value_parser = parse_effect)]
    effect: Option<Effect>,

    /// Brand contains this text
    #[arg(long)]
    brand: Option<String>,

    /// Strain type (Hybrid, Indica, Sativa)
    #[arg(long = "type", value_parser = parse_strain_type)]
    strain_type: Option<StrainType>,

    /// Only reviews with this terpene
    #[arg(long, value_parser = parse_terpene)]
    terpene: Option<Terpene>,

    /// Strain name contains this text
    #[arg(short, long)]
    search: Option<String>,
}

impl From<FilterArgs> for StrainFilter {
    fn from(args: FilterArgs) -> Self {
        StrainFilter {
            min_rating: args.min_rating,
            effect: args.effect,
            brand: args.brand.unwrap_or_default(),
            strain_type: args.strain_type,
            terpene: args.terpene,
            search: args.search.unwrap_or_default(),
        }
    }
}

/// Review fields settable from the command line. Unset flags keep the
/// form's current value.
#[derive(Args)]
struct FieldArgs {
    /// Product type (Flower, Edible, Concentrate, Vape, Tincture, Topical)
    #[arg(long, value_parser = parse_product_type)]
    product: Option<ProductType>,

    /// Strain type (Hybrid, Indica, Sativa)
    #[arg(long = "type", value_parser = parse_strain_type)]
    strain_type: Option<StrainType>,

    /// Brand (empty to clear)
    #[arg(long)]
    brand: Option<String>,

    /// Where it was purchased (empty to clear)
    #[arg(long)]
    location: Option<String>,

    /// Cost, e.g. 35 or $35.50 (empty to clear)
    #[arg(long)]
    cost: Option<String>,

    /// Rating (0-5)
    #[arg(short, long)]
    rating: Option<u8>,

    /// Reported effect; repeat for more. Replaces the current effects.
    #[arg(long = "effect", value_parser = parse_effect)]
    effects: Vec<Effect>,

    /// Dominant terpene; repeat for up to three. Replaces the current terpenes.
    #[arg(long = "terpene", value_parser = parse_terpene)]
    terpenes: Vec<Terpene>,
}

fn parse_tag<T: Copy + std::fmt::Display>(
    raw: &str,
    parse: fn(&str) -> Option<T>,
    all: &[T],
) -> Result<T, String> {
    parse(raw).ok_or_else(|| {
        let expected: Vec<String> = all.iter().map(ToString::to_string).collect();
        format!("expected one of: {}", expected.join(", "))
    })
}

fn parse_effect(raw: &str) -> Result<Effect, String> {
    parse_tag(raw, Effect::parse, Effect::ALL)
}

fn parse_terpene(raw: &str) -> Result<Terpene, String> {
    parse_tag(raw, Terpene::parse, Terpene::ALL)
}

fn parse_strain_type(raw: &str) -> Result<StrainType, String> {
    parse_tag(raw, StrainType::parse, StrainType::ALL)
}

fn parse_product_type(raw: &str) -> Result<ProductType, String> {
    parse_tag(raw, ProductType::parse, ProductType::ALL)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let paths = Paths::new().ok();
    // A broken config file is reported by the command that needs it.
    let config = paths
        .as_ref()
        .and_then(|paths| Config::load(paths).ok())
        .unwrap_or_default();
    init_logging(
        "cli",
        config.log_level_or(cli.log_level.as_deref()),
        paths.map(|paths| paths.log_file()),
    );

    let format = cli.format;
    let result = match cli.command {
        Commands::List { filter } => commands::list(filter.into(), &format).await,
        Commands::Community { filter } => commands::community(filter.into(), &format).await,
        Commands::Add { name, fields } => commands::add(name, fields, &format).await,
        Commands::Update { id, name, fields } => {
            commands::update(&id, name, fields, &format).await
        }
        Commands::Delete { id } => commands::delete(&id, &format).await,
        Commands::Stats { community } => commands::stats(community, &format).await,
        Commands::Legality { state } => commands::legality(state.as_deref(), &format),
        Commands::Admin => commands::admin(&format).await,
        Commands::Watch { community } => commands::watch(community, &format).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
