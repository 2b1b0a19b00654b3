//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl link crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_with_hash, validate, Config, FetcherKind};
use ripple_crawl::crawler::{crawl, Strategy};
use ripple_crawl::fetch::{Fetcher, HttpFetcher, StaticFetcher};
use ripple_crawl::output::{print_summary, ConsoleReporter, CrawlSummary};
use ripple_crawl::state::VisitedRegistry;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a concurrent, depth-bounded link crawler
///
/// Crawls every page reachable from a seed URL within a depth budget,
/// fetching each page at most once. Without a config file it crawls a
/// built-in set of canned pages starting at https://golang.org/.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded link crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Orchestration strategy: 'channel' (default) or 'wg'
    #[arg(short, long, value_enum)]
    algorithm: Option<Strategy>,

    /// URL to start crawling from
    #[arg(short, long)]
    seed: Option<String>,

    /// Number of levels to explore (0 fetches nothing)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Fetch pages over HTTP instead of from canned pages
    #[arg(long)]
    http: bool,

    /// Print a summary of the run when it finishes
    #[arg(long)]
    summary: bool,

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

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (cfg, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid crawl settings")?;

    let summary = match config.fetcher.kind {
        FetcherKind::Static => {
            let fetcher = if config.pages.is_empty() {
                tracing::debug!("No pages configured, using built-in fixture");
                StaticFetcher::golang_fixture()
            } else {
                StaticFetcher::from_pages(&config.pages)
            };
            run(&config, fetcher).await
        }
        FetcherKind::Http => {
            let fetcher =
                HttpFetcher::new(&config.http).context("Failed to build HTTP client")?;
            run(&config, fetcher).await
        }
    };

    if cli.summary {
        print_summary(&summary);
    }

    Ok(())
}

/// Command-line flags take precedence over the config file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(strategy) = cli.algorithm {
        config.crawler.strategy = strategy;
    }
    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if cli.http {
        config.fetcher.kind = FetcherKind::Http;
    }
}

async fn run<F: Fetcher>(config: &Config, fetcher: F) -> CrawlSummary {
    crawl(
        config.crawler.strategy,
        &config.crawler.seed,
        config.crawler.max_depth,
        Arc::new(fetcher),
        Arc::new(ConsoleReporter::new()),
        Arc::new(VisitedRegistry::new()),
    )
    .await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
