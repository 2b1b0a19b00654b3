//! Channel-based crawl orchestration
//!
//! A single coordinator owns the live-task counter and is the only reader of
//! the results channel. Fetch tasks never spawn anything themselves: each
//! one fetches a single URL and sends its result back. The counter starts at
//! one for the seed, is decremented for every result received and
//! incremented for every task spawned, and the run ends when it reaches zero.

use crate::crawler::{fetch_isolated, CrawlContext, Strategy};
use crate::fetch::{FetchError, FetchedPage, Fetcher};
use crate::output::{CrawlSummary, Reporter};
use crate::state::VisitedRegistry;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedSender};

/// Result of one fetch task, sent to the coordinator
#[derive(Debug)]
struct TaskResult {
    url: String,
    outcome: Result<FetchedPage, FetchError>,
    /// Depth budget left for this page's links (parent depth minus one)
    depth: u32,
}

/// Runs a crawl driven by a coordinator loop over a results channel
///
/// # Arguments
///
/// * `seed` - URL the crawl starts from
/// * `max_depth` - Number of levels to explore; 0 fetches nothing
/// * `fetcher` - Source of page content and links
/// * `reporter` - Sink receiving one report per fetched or failed page
/// * `registry` - A fresh visited registry for this run
///
/// # Returns
///
/// A summary of the run. The crawl never fails as a whole; fetch failures
/// are reported and only stop their own branch.
pub async fn run_channel_crawl<F: Fetcher, R: Reporter>(
    seed: &str,
    max_depth: u32,
    fetcher: Arc<F>,
    reporter: Arc<R>,
    registry: Arc<VisitedRegistry>,
) -> CrawlSummary {
    let start = Instant::now();
    let ctx = Arc::new(CrawlContext::new(fetcher, reporter, registry));

    tracing::info!(
        "Starting channel crawl from {} (max depth {})",
        seed,
        max_depth
    );

    if max_depth == 0 {
        tracing::debug!("Depth budget is zero, nothing to fetch");
        return ctx.finish(Strategy::Channel, seed, max_depth, start.elapsed());
    }

    let (results_tx, mut results_rx) = mpsc::unbounded_channel::<TaskResult>();

    ctx.registry.insert(seed);
    spawn_fetch(&ctx, &results_tx, seed.to_string(), max_depth);
    let mut live_tasks: usize = 1;

    while live_tasks > 0 {
        // The coordinator holds a sender, so the channel only closes if
        // the runtime is shutting down underneath us.
        let Some(result) = results_rx.recv().await else {
            tracing::error!(
                "Results channel closed with {} tasks outstanding",
                live_tasks
            );
            break;
        };
        live_tasks -= 1;

        let page = match result.outcome {
            Ok(page) => page,
            Err(error) => {
                ctx.report_failure(&result.url, &error);
                continue;
            }
        };

        ctx.report_found(&result.url, &page.body);

        if result.depth == 0 {
            continue;
        }

        for link in page.links {
            if ctx.registry.check_and_insert(&link) {
                live_tasks += 1;
                spawn_fetch(&ctx, &results_tx, link, result.depth);
            } else {
                ctx.stats.record_skipped();
            }
        }

        tracing::trace!("{} tasks outstanding", live_tasks);
    }

    ctx.finish(Strategy::Channel, seed, max_depth, start.elapsed())
}

/// Spawns a task that fetches `url` and sends the outcome to the coordinator
///
/// A panicking fetcher still yields exactly one result; otherwise the
/// coordinator would wait forever.
fn spawn_fetch<F: Fetcher, R: Reporter>(
    ctx: &Arc<CrawlContext<F, R>>,
    results_tx: &UnboundedSender<TaskResult>,
    url: String,
    depth: u32,
) {
    tracing::debug!("Spawning fetch for {} (depth {})", url, depth);

    let fetcher = Arc::clone(&ctx.fetcher);
    let registry = Arc::clone(&ctx.registry);
    let results_tx = results_tx.clone();

    tokio::spawn(async move {
        let outcome = fetch_isolated(fetcher, url.clone()).await;

        // Recorded whatever the outcome, before the result is looked at
        registry.insert(&url);

        let result = TaskResult {
            url,
            outcome,
            depth: depth - 1,
        };
        if results_tx.send(result).is_err() {
            tracing::debug!("Coordinator gone, dropping fetch result");
        }
    });
}
