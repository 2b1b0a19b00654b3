//! Crawler module: the two orchestration strategies
//!
//! This module contains the core crawling logic:
//! - `channel`: a single coordinator reads task results from an mpsc channel
//!   and owns the live-task counter
//! - `wait_group`: every task recurses on its own and a shared counted
//!   barrier tells the caller when the last one has exited
//!
//! Both strategies share one `VisitedRegistry` per run and reserve a URL with
//! an atomic check-and-insert before it is fetched, so each URL is fetched at
//! most once.

mod barrier;
mod channel;
mod wait_group;

pub use barrier::{WaitGroup, WaitGroupGuard};
pub use channel::run_channel_crawl;
pub use wait_group::run_wait_group_crawl;

use crate::fetch::{FetchError, FetchedPage, Fetcher};
use crate::output::{CrawlStats, CrawlSummary, Reporter};
use crate::state::VisitedRegistry;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Orchestration strategy for a crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
pub enum Strategy {
    /// Coordinator loop over a results channel
    #[default]
    #[serde(rename = "channel")]
    #[value(name = "channel")]
    Channel,

    /// Recursive fan-out over a wait group
    #[serde(rename = "wg")]
    #[value(name = "wg")]
    WaitGroup,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::WaitGroup => "wg",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "channel" => Ok(Self::Channel),
            "wg" => Ok(Self::WaitGroup),
            other => Err(format!(
                "Unknown algorithm '{}'. Valid values are: 'channel' or 'wg'",
                other
            )),
        }
    }
}

/// Runs a crawl with the selected strategy
///
/// # Arguments
///
/// * `strategy` - Which orchestrator to run
/// * `seed` - URL the crawl starts from
/// * `max_depth` - Number of levels to explore; 0 fetches nothing
/// * `fetcher` - Source of page content and links
/// * `reporter` - Sink receiving one report per fetched or failed page
/// * `registry` - A fresh visited registry for this run
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::{crawl, Strategy};
/// use ripple_crawl::fetch::StaticFetcher;
/// use ripple_crawl::output::MemoryReporter;
/// use ripple_crawl::state::VisitedRegistry;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let fetcher = Arc::new(StaticFetcher::new().with_page("A", "a", &["B"]).with_page("B", "b", &[]));
/// let reporter = Arc::new(MemoryReporter::new());
/// let summary = crawl(
///     Strategy::WaitGroup,
///     "A",
///     2,
///     fetcher,
///     reporter.clone(),
///     Arc::new(VisitedRegistry::new()),
/// )
/// .await;
/// assert_eq!(summary.pages_fetched, 2);
/// assert_eq!(reporter.found_urls(), vec!["A", "B"]);
/// # }
/// ```
pub async fn crawl<F: Fetcher, R: Reporter>(
    strategy: Strategy,
    seed: &str,
    max_depth: u32,
    fetcher: Arc<F>,
    reporter: Arc<R>,
    registry: Arc<VisitedRegistry>,
) -> CrawlSummary {
    match strategy {
        Strategy::Channel => run_channel_crawl(seed, max_depth, fetcher, reporter, registry).await,
        Strategy::WaitGroup => {
            run_wait_group_crawl(seed, max_depth, fetcher, reporter, registry).await
        }
    }
}

/// Fetches `url` on its own task
///
/// A fetcher that panics yields `FetchError::Aborted` instead of unwinding
/// through the caller, so every fetch produces exactly one outcome.
pub(crate) async fn fetch_isolated<F: Fetcher>(
    fetcher: Arc<F>,
    url: String,
) -> Result<FetchedPage, FetchError> {
    let fetch_url = url.clone();
    match tokio::spawn(async move { fetcher.fetch(&fetch_url).await }).await {
        Ok(outcome) => outcome,
        Err(join_error) => Err(FetchError::Aborted {
            url,
            message: join_error.to_string(),
        }),
    }
}

/// Everything a crawl task needs, shared by `Arc` across the run
pub(crate) struct CrawlContext<F, R> {
    pub(crate) fetcher: Arc<F>,
    pub(crate) registry: Arc<VisitedRegistry>,
    pub(crate) stats: CrawlStats,
    reporter: Arc<R>,
}

impl<F: Fetcher, R: Reporter> CrawlContext<F, R> {
    pub(crate) fn new(fetcher: Arc<F>, reporter: Arc<R>, registry: Arc<VisitedRegistry>) -> Self {
        Self {
            fetcher,
            registry,
            stats: CrawlStats::new(),
            reporter,
        }
    }

    pub(crate) fn report_found(&self, url: &str, body: &str) {
        self.stats.record_fetched();
        self.reporter.found(url, body);
    }

    pub(crate) fn report_failure(&self, url: &str, error: &FetchError) {
        self.stats.record_failure();
        tracing::warn!("Fetch failed for {}: {}", url, error);
        self.reporter.failed(url, error);
    }

    pub(crate) fn finish(
        &self,
        strategy: Strategy,
        seed: &str,
        max_depth: u32,
        elapsed: Duration,
    ) -> CrawlSummary {
        let summary = CrawlSummary::from_stats(
            strategy,
            seed,
            max_depth,
            &self.stats,
            self.registry.len(),
            elapsed,
        );
        tracing::info!("Crawl completed: {}", summary);
        summary
    }
}
