//! Skein main entry point
//!
//! This is the command-line interface for the Skein crawler. Discovered URLs
//! go to stdout, one per line; logs go to stderr.

use anyhow::Context;
use clap::Parser;
use skein::config::{load_config, parse_duration, validate, Config};
use skein::crawler::crawl;
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Skein: a bounded-rate concurrent web crawler
///
/// Skein crawls outward from a seed URL, fetching at most one page per
/// `--rate` interval, and prints every newly discovered URL once until the
/// time limit expires.
#[derive(Parser, Debug)]
#[command(name = "skein")]
#[command(version)]
#[command(about = "A bounded-rate concurrent web crawler", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(long, value_name = "URL", required_unless_present = "config")]
    url: Option<String>,

    /// Minimum time between admitted requests (e.g. 100ms, 1s)
    #[arg(long, value_parser = parse_duration)]
    rate: Option<Duration>,

    /// Total crawl duration (e.g. 10s, 2m)
    #[arg(long, value_parser = parse_duration)]
    time_limit: Option<Duration>,

    /// Maximum number of simultaneous fetches (unbounded if unset)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Capacity of the pending URL queue
    #[arg(long)]
    frontier_capacity: Option<usize>,

    /// Path to a TOML configuration file; flags override its values
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show it without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    tokio::spawn(forward_ctrl_c(cancel.clone()));

    let stats = crawl(config, cancel).await.context("crawl failed")?;
    tracing::info!("Crawl finished: {}", stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("skein=info,warn"),
            1 => EnvFilter::new("skein=debug,info"),
            2 => EnvFilter::new("skein=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, then applies flag overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.url) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        (None, Some(url)) => Config::new(url.clone()),
        (None, None) => anyhow::bail!("either --url or --config is required"),
    };

    if let Some(url) = &cli.url {
        config.crawler.seed_url = url.clone();
    }
    if let Some(rate) = cli.rate {
        config.crawler.rate = rate;
    }
    if let Some(time_limit) = cli.time_limit {
        config.crawler.time_limit = time_limit;
    }
    if let Some(cap) = cli.concurrency {
        config.crawler.concurrency_cap = Some(cap);
    }
    if let Some(capacity) = cli.frontier_capacity {
        config.crawler.frontier_capacity = capacity;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn print_dry_run(config: &Config) {
    println!("=== Skein Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Rate: {:?}", config.crawler.rate);
    println!("  Time limit: {:?}", config.crawler.time_limit);
    match config.crawler.concurrency_cap {
        Some(cap) => println!("  Concurrency cap: {}", cap),
        None => println!("  Concurrency cap: unbounded"),
    }
    println!("  Frontier capacity: {}", config.crawler.frontier_capacity);
    println!("  Discovered buffer: {}", config.crawler.discovered_buffer);

    println!("\nHTTP:");
    println!("  User agent: {}", config.user_agent.header_value());
    println!("  Request timeout: {:?}", config.http.request_timeout);
    println!("  Connect timeout: {:?}", config.http.connect_timeout);

    println!("\n✓ Configuration is valid");
}

/// Cancels the crawl on Ctrl-C
async fn forward_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Interrupted, stopping crawl");
            cancel.cancel();
        }
        Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {}", e),
    }
}
