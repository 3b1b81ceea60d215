//! BOQ Estimator - command line entry point
//!
//! Prints catalog rates, dashboard summaries and export tables for project
//! files, and runs LLM costing passes over a project's items.

use boq_estimator::core::config::EstimatorConfig;
use boq_estimator::core::error::{EstimateError, Result};
use boq_estimator::core::types::{ClientId, ItemId};
use boq_estimator::llm::{LlmClient, LlmProposalGenerator};
use boq_estimator::project::load_project;
use boq_estimator::rates::{apply_markup, RateCatalog};
use boq_estimator::session::ProjectSession;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Construction cost estimation with rate breakdowns
#[derive(Parser, Debug)]
#[command(name = "boq-estimator")]
#[command(about = "Estimate BOQ items with Breakdown of Schedule of Rates")]
struct Args {
    /// Estimator config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rate catalog file (TOML); built-in Doha rates when omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print catalog rates, marked up for a client
    Rates {
        /// Client profile id
        #[arg(long)]
        client: Option<u32>,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the dashboard of a project
    Summary {
        project: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the export table of a project
    Export {
        project: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Run costing passes against the configured LLM, then print the dashboard
    #[command(group(ArgGroup::new("target").required(true).args(["item", "all"])))]
    Cost {
        project: PathBuf,

        /// Cost a single item
        #[arg(long)]
        item: Option<u32>,

        /// Cost every item on the sheet
        #[arg(long)]
        all: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("boq_estimator=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EstimatorConfig::load_from_toml(path)?,
        None => EstimatorConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => RateCatalog::load_from_toml(path)?,
        None => RateCatalog::with_defaults(),
    };

    match args.command {
        Command::Rates { client, format } => print_rates(&catalog, client.map(ClientId), format),
        Command::Summary { project, format } => {
            let session = load_project(&project, config, catalog)?;
            let summary = session.dashboard();
            match format {
                Format::Text => print!("{}", summary.render()),
                Format::Json => println!("{}", summary.to_json()),
            }
            Ok(())
        }
        Command::Export { project, format } => {
            let session = load_project(&project, config, catalog)?;
            let table = session.export_table();
            match format {
                Format::Text => print!("{}", table.render_text()),
                Format::Json => println!("{}", table.to_json()),
            }
            Ok(())
        }
        Command::Cost { project, item, all } => {
            let target = if all { None } else { item.map(ItemId) };
            run_cost(&project, config, catalog, target)
        }
    }
}

fn print_rates(catalog: &RateCatalog, client: Option<ClientId>, format: Format) -> Result<()> {
    let profile = match client {
        Some(id) => Some(catalog.client(id).ok_or(EstimateError::ClientNotFound(id))?),
        None => None,
    };
    let rates = apply_markup(catalog, profile);

    if format == Format::Json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
        return Ok(());
    }

    match profile {
        Some(p) => println!("Rates for {} (+{}%)", p.name, p.markup_percentage),
        None => println!("Catalog rates (no markup)"),
    }
    println!("\nManpower (QAR/hr):");
    for r in &rates.manpower {
        println!("  {:<32} {:>8.2}", r.role, r.hourly_rate);
    }
    println!("\nEquipment (QAR/hr):");
    for r in &rates.equipment {
        println!("  {:<32} {:>8.2}", r.item, r.hourly_rate);
    }
    println!("\nMaterials (QAR):");
    for m in &rates.materials {
        println!("  {:<32} {:>8.2} per {}", m.name, m.unit_price, m.unit);
    }
    println!("\nClients:");
    for c in catalog.clients() {
        println!("  [{}] {:<28} {:>5.1}%", c.id.0, c.name, c.markup_percentage);
    }
    Ok(())
}

fn run_cost(
    project: &Path,
    config: EstimatorConfig,
    catalog: RateCatalog,
    item: Option<ItemId>,
) -> Result<()> {
    // `None` costs every item
    let client = LlmClient::from_env(&config.llm)?;
    let generator = LlmProposalGenerator::new(client);
    let mut session: ProjectSession = load_project(project, config, catalog)?;

    let rt = Runtime::new()?;
    match item {
        Some(id) => rt.block_on(session.run_costing(id, &generator))?,
        None => {
            let ids: Vec<ItemId> = session.sheet().items().iter().map(|i| i.id()).collect();
            let report = rt.block_on(session.run_bulk_costing(&ids, &generator));
            for (id, err) in &report.failed {
                println!("Item {} not costed: {}", id, err);
            }
        }
    }

    print!("{}", session.dashboard().render());
    Ok(())
}
