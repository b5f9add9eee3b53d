//! Hub-Harvest main entry point
//!
//! Command-line interface for the model catalog harvester.

use anyhow::Context;
use clap::Parser;
use hub_harvest::config::load_config_with_hash;
use hub_harvest::crawler::run_harvest;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hub-Harvest: a resumable model catalog harvester
///
/// Hub-Harvest walks a paginated model catalog, downloads each model's
/// README with a pool of rate-limited workers, and records per-item
/// outcomes so an interrupted run picks up where it left off.
#[derive(Parser, Debug)]
#[command(name = "hub-harvest")]
#[command(version)]
#[command(about = "A resumable model catalog harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show outcome statistics from the result store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hub_harvest=info,warn"),
            1 => EnvFilter::new("hub_harvest=debug,info"),
            2 => EnvFilter::new("hub_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what a run would do
fn handle_dry_run(config: &hub_harvest::config::Config) {
    println!("=== Hub-Harvest Dry Run ===\n");

    println!("Catalog API:");
    println!("  Base URL: {}", config.api.base_url);
    println!("  Page size: {}", config.api.page_size);
    println!("  Listing interval: {}ms", config.api.list_interval);
    println!("  Request timeout: {}s", config.api.request_timeout);

    println!("\nHarvester:");
    println!("  Workers: {}", config.harvester.credentials.len());
    println!("  Fetch interval: {}ms", config.harvester.fetch_interval);
    if let Some(max_items) = config.harvester.max_items {
        println!("  Item cap: {}", max_items);
    }
    if let Some(min_likes) = config.harvester.min_likes {
        println!("  Minimum likes: {}", min_likes);
    }
    if let Some(min_downloads) = config.harvester.min_downloads {
        println!("  Minimum downloads: {}", min_downloads);
    }

    println!("\nOutput:");
    println!("  Result store: {}", config.output.results_path);
    println!("  Artifacts: {}", config.output.artifact_dir);
    println!("  Metadata snapshots: {}", config.output.metadata_dir);
    println!("  Summary: {}", config.output.summary_path);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would harvest with {} worker(s)",
        config.harvester.credentials.len()
    );
}

/// Handles the --stats mode: shows outcome counts from the result store
fn handle_stats(config: &hub_harvest::config::Config) -> anyhow::Result<()> {
    use hub_harvest::output::{load_outcome_stats, print_outcome_stats};
    use std::path::Path;

    println!("Result store: {}\n", config.output.results_path);

    let stats = load_outcome_stats(Path::new(&config.output.results_path))
        .context("failed to read result store")?;
    print_outcome_stats(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: hub_harvest::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Starting harvest with {} worker(s) against {}",
        config.harvester.credentials.len(),
        config.api.base_url
    );

    let summary = run_harvest(config).await.context("harvest failed")?;

    println!(
        "Harvest finished: {} processed ({} ok, {} missing, {} retriable errors)",
        summary.processed, summary.succeeded, summary.not_found, summary.failed
    );
    if summary.failed > 0 {
        println!("Re-run with the same configuration to retry the errored items.");
    }

    Ok(())
}
