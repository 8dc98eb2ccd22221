//! Plumb main entry point
//!
//! Command-line interface over [`plumb::Crawler`]: crawl from a seed URL to
//! a fixed hop depth and print the downloaded links and per-link failures.

use anyhow::Context;
use clap::Parser;
use plumb::config::{load_config, validate, CrawlConfig};
use plumb::fetch::HttpFetcher;
use plumb::Crawler;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Plumb: a depth-bounded concurrent link crawler
///
/// Fetches the seed URL, extracts its links, and follows them breadth-first
/// up to the requested depth under global, per-host, and extraction
/// concurrency limits.
#[derive(Parser, Debug)]
#[command(name = "plumb")]
#[command(version)]
#[command(about = "A depth-bounded concurrent link crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// How many link hops to follow from the seed (0 crawls nothing)
    #[arg(value_name = "DEPTH", default_value_t = 1)]
    depth: usize,

    /// Maximum number of simultaneously fetched pages
    #[arg(long)]
    downloads: Option<usize>,

    /// Maximum number of pages having links extracted simultaneously
    #[arg(long)]
    extractors: Option<usize>,

    /// Maximum simultaneous fetches against a single host
    #[arg(long = "per-host")]
    per_host: Option<usize>,

    /// Skip links containing this substring (repeatable)
    #[arg(long = "exclude", value_name = "PATTERN")]
    excludes: Vec<String>,

    /// Restrict the crawl to this host (repeatable; replaces excludes)
    #[arg(long = "host", value_name = "HOST")]
    hosts: Vec<String>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = merge_config(&cli)?;

    let fetcher = Arc::new(HttpFetcher::new().context("Failed to build HTTP client")?);
    let crawler = Crawler::new(fetcher, &config.limits)?;

    let result = if config.hosts.is_empty() {
        crawler
            .crawl_with_excludes(&cli.url, cli.depth, &config.excludes)
            .await
    } else {
        crawler
            .crawl_restricted(&cli.url, cli.depth, &config.hosts)
            .await
    };

    println!("Downloaded:");
    let mut downloaded: Vec<_> = result.downloaded.iter().collect();
    downloaded.sort();
    for link in downloaded {
        println!("{}", link);
    }

    if !result.errors.is_empty() {
        println!("ERRORS:");
        let mut failed: Vec<_> = result.errors.iter().collect();
        failed.sort_by_key(|(link, _)| link.as_str());
        for (link, reason) in failed {
            println!("{} Reason: {}", link, reason);
        }
    }

    crawler.shutdown().await;

    Ok(())
}

/// Loads the config file (if any) and applies CLI overrides on top
fn merge_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => CrawlConfig::default(),
    };

    if let Some(downloads) = cli.downloads {
        config.limits.downloads = downloads;
    }
    if let Some(extractors) = cli.extractors {
        config.limits.extractors = extractors;
    }
    if let Some(per_host) = cli.per_host {
        config.limits.per_host = per_host;
    }
    if !cli.excludes.is_empty() {
        config.excludes = cli.excludes.clone();
    }
    if !cli.hosts.is_empty() {
        config.hosts = cli.hosts.clone();
    }

    // Re-validate after overrides; flag values get the same checks as the
    // file contents
    validate(&config)?;

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("plumb=info,warn"),
            1 => EnvFilter::new("plumb=debug,info"),
            2 => EnvFilter::new("plumb=trace,debug"),
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
