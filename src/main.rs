use anyhow::Result;
use clap::{Parser, Subcommand};

use grantwatch::cli::{handle_aggregate, handle_apply, handle_audit, handle_diff};
use grantwatch::config::{Catalog, GrantwatchPaths};
use grantwatch::models::Month;

#[derive(Parser)]
#[command(
    name = "grantwatch",
    version,
    about = "Database account snapshot diff, baseline reconciliation, and access audit",
    long_about = "grantwatch tracks database user accounts and privileges over time. \
                  It diffs monthly account snapshots into typed change actions, \
                  reconciles recorded changes into a baseline inventory, and audits \
                  the baseline against least-privilege rules."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two months of account snapshots
    Diff {
        /// Earlier month (YYYY-MM)
        prev: Month,
        /// Later month (YYYY-MM)
        curr: Month,
    },

    /// Consolidate a month's change files into the review payload
    Aggregate {
        /// Target month (YYYY-MM), defaults to the previous calendar month
        month: Option<Month>,
    },

    /// Apply all recorded change files to the baseline
    Apply,

    /// Run the least-privilege audit for a month
    Audit {
        /// Target month (YYYY-MM), defaults to the previous calendar month
        month: Option<Month>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // Initialize paths and the database catalog
    let paths = GrantwatchPaths::new()?;
    paths.ensure_directories()?;
    let catalog = Catalog::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Diff { prev, curr }) => {
            handle_diff(&paths, prev, curr)?;
        }
        Some(Commands::Aggregate { month }) => {
            handle_aggregate(&paths, &catalog, month)?;
        }
        Some(Commands::Apply) => {
            handle_apply(&paths, &catalog)?;
        }
        Some(Commands::Audit { month }) => {
            handle_audit(&paths, month)?;
        }
        Some(Commands::Config) => {
            println!("grantwatch Configuration");
            println!("========================");
            println!("Data directory:      {}", paths.base_dir().display());
            println!("Config directory:    {}", paths.config_dir().display());
            println!("Snapshots directory: {}", paths.snapshots_dir().display());
            println!("Changes directory:   {}", paths.changes_dir().display());
            println!("Reports directory:   {}", paths.reports_dir().display());
            println!();
            println!("Catalog: {} tracked databases", catalog.len());
        }
        None => {
            println!("grantwatch - database account review");
            println!();
            println!("Run 'grantwatch --help' for usage information.");
        }
    }

    Ok(())
}
