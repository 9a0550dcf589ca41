//! # geodash CLI entry point
//!
//! Parses command-line arguments, builds the catalog once and dispatches to
//! the subcommand handlers.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use geodash_core::DEFAULT_SEED;
use tracing_subscriber::EnvFilter;

use geodash_cli::catalog::{run_countries, run_sectors, run_zones, CountriesArgs, SectorsArgs};
use geodash_cli::explore::{run_explore, ExploreArgs};
use geodash_cli::export::{run_export, ExportArgs};
use geodash_cli::load_catalog;

/// Zone, country and sector explorer over the company fact table.
#[derive(Parser, Debug)]
#[command(name = "geodash", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Seed for the synthetic fact table.
    #[arg(long, global = true, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// YAML file mapping zone names to country lists.
    #[arg(long, global = true)]
    taxonomy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every zone.
    Zones,

    /// List the countries of a zone with their territory codes.
    Countries(CountriesArgs),

    /// List the sectors present for a country.
    Sectors(SectorsArgs),

    /// Apply a zone, click and sector selection and print the view as JSON.
    Explore(ExploreArgs),

    /// Apply a full selection and write its CSV export.
    Export(ExportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = load_catalog(cli.taxonomy.as_deref(), cli.seed).and_then(|catalog| {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let code = match &cli.command {
            Commands::Zones => run_zones(&catalog, &mut out),
            Commands::Countries(args) => run_countries(args, &catalog, &mut out),
            Commands::Sectors(args) => run_sectors(args, &catalog, &mut out),
            Commands::Explore(args) => run_explore(args, &catalog, &mut out),
            Commands::Export(args) => run_export(args, &catalog, &mut out),
        }?;
        out.flush()?;
        Ok(code)
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
