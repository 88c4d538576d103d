//! Stream-Harvest main entry point
//!
//! This is the command-line interface for the Stream-Harvest playlist builder.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use stream_harvest::config::{load_config_with_hash, validate, Config};
use stream_harvest::output::print_summary;
use stream_harvest::run_pipeline;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Stream-Harvest: catalog crawler and M3U playlist builder
///
/// Stream-Harvest walks a paginated media catalog, resolves every entry to its playable
/// stream URLs and writes them to an M3U playlist.
#[derive(Parser, Debug)]
#[command(name = "stream-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Builds M3U playlists from paginated media catalogs", long_about = None)]
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

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Override the playlist output path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Override the maximum number of catalog pages
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Override the delay between entries, in seconds
    #[arg(long, value_name = "SECS")]
    delay: Option<f64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid command-line override")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("stream_harvest=info,warn"),
            1 => EnvFilter::new("stream_harvest=debug,info"),
            2 => EnvFilter::new("stream_harvest=trace,debug"),
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

fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(output) = &cli.output {
        config.playlist.path = output.to_string_lossy().into_owned();
    }
    if let Some(max_pages) = cli.max_pages {
        config.source.max_pages = Some(max_pages);
    }
    if let Some(delay) = cli.delay {
        config.orchestrator.entry_delay_secs = delay;
    }
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Stream-Harvest Dry Run ===\n");

    println!("Source:");
    println!("  Name: {}", config.source.name);
    println!("  Kind: {:?}", config.source.kind);
    println!("  Page URL: {}", config.source.page_url);
    println!("  Initial page: {}", config.source.initial_page);
    match config.source.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unbounded"),
    }

    println!("\nHTTP:");
    println!("  User agent: {}", config.http.user_agent);
    println!("  Timeout: {}s", config.http.timeout_secs);
    println!("  Retries: {}", config.http.max_retries);

    println!("\nResolver:");
    println!("  Stream suffixes: {}", config.resolver.stream_suffixes.join(", "));
    if !config.resolver.qualities.is_empty() {
        println!("  Qualities: {}", config.resolver.qualities.join(", "));
    }
    if let Some(hop) = &config.resolver.multi_hop {
        println!("  Multi-hop: {}", hop.indirection_url);
    }
    if let Some(seasons) = &config.resolver.seasons {
        println!("  Seasons: {}", seasons.url);
    }

    println!("\nOutput:");
    println!("  Playlist: {}", config.playlist.path);
    if let Some(report) = &config.playlist.report_path {
        println!("  Report: {}", report);
    }
    println!("  Entry delay: {}s", config.orchestrator.entry_delay_secs);

    println!("\n✓ Configuration is valid");
}

/// Runs the harvest, stopping gracefully on Ctrl-C
async fn handle_harvest(config: Config, quiet: bool) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current entry");
            signal_token.cancel();
        }
    });

    let summary = run_pipeline(config, cancel).await?;

    if !quiet {
        println!();
        print_summary(&summary);
    }

    Ok(())
}
