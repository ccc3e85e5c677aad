//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl single-host crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config};
use ripple_crawl::crawler::crawl;
use ripple_crawl::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a single-host web crawler
///
/// Ripple-Crawl starts from one URL, follows the links it finds with a pool
/// of concurrent workers, and reports the top keywords and meta description
/// of every HTML page it reaches.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version = "1.0.0")]
#[command(about = "A single-host web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(short, long, value_name = "URL")]
    target: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of concurrent workers (overrides the config file)
    #[arg(long)]
    workers: Option<u32>,

    /// Stop after dispatching this many URLs (overrides the config file)
    #[arg(long)]
    max_pages: Option<usize>,

    /// Increase logging verbosity and list every analyzed page (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log everything the crawler does
    #[arg(short, long)]
    debug: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with_all = ["verbose", "debug"])]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.debug, cli.quiet);

    let config = load_effective_config(&cli)?;

    tracing::info!(
        "Crawling {} with {} workers (max pages: {})",
        cli.target,
        config.crawler.workers,
        config
            .crawler
            .max_pages
            .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
    );

    let report = crawl(config, &cli.target)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.target))?;

    if !cli.quiet {
        print_report(&report, cli.verbose > 0 || cli.debug);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, debug: bool, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else if debug {
        EnvFilter::new("ripple_crawl=trace,debug")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            _ => EnvFilter::new("ripple_crawl=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (or defaults) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }

    validate(&config).context("Invalid command-line override")?;

    Ok(config)
}
