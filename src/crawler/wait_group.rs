//! Recursive fan-out crawl orchestration
//!
//! There is no coordinator. Each task explores one URL and spawns one child
//! task per outbound link. A shared `WaitGroup` counts outstanding tasks: a
//! unit is added before a child is spawned and the child's guard releases it
//! when the child exits, whichever way it exits. The caller waits for the
//! count to return to zero.

use crate::crawler::{fetch_isolated, CrawlContext, Strategy, WaitGroup, WaitGroupGuard};
use crate::fetch::Fetcher;
use crate::output::{CrawlSummary, Reporter};
use crate::state::VisitedRegistry;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

type VisitFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Runs a crawl where every task recurses independently
///
/// Blocks the calling task until every spawned task, and all of their
/// children, have exited.
///
/// # Arguments
///
/// * `seed` - URL the crawl starts from
/// * `max_depth` - Number of levels to explore; 0 fetches nothing
/// * `fetcher` - Source of page content and links
/// * `reporter` - Sink receiving one report per fetched or failed page
/// * `registry` - A fresh visited registry for this run
pub async fn run_wait_group_crawl<F: Fetcher, R: Reporter>(
    seed: &str,
    max_depth: u32,
    fetcher: Arc<F>,
    reporter: Arc<R>,
    registry: Arc<VisitedRegistry>,
) -> CrawlSummary {
    let start = Instant::now();
    let ctx = Arc::new(CrawlContext::new(fetcher, reporter, registry));
    let wg = WaitGroup::new();

    tracing::info!(
        "Starting wait-group crawl from {} (max depth {})",
        seed,
        max_depth
    );

    spawn_visit(&ctx, &wg, seed.to_string(), max_depth);
    wg.wait().await;

    ctx.finish(Strategy::WaitGroup, seed, max_depth, start.elapsed())
}

/// Adds a unit to the wait group and spawns the task that owns it
fn spawn_visit<F: Fetcher, R: Reporter>(
    ctx: &Arc<CrawlContext<F, R>>,
    wg: &WaitGroup,
    url: String,
    depth: u32,
) {
    let guard = wg.add();
    tokio::spawn(visit(Arc::clone(ctx), wg.clone(), url, depth, guard));
}

// Boxed so the recursion through `spawn_visit` has a nameable future type.
fn visit<F: Fetcher, R: Reporter>(
    ctx: Arc<CrawlContext<F, R>>,
    wg: WaitGroup,
    url: String,
    depth: u32,
    guard: WaitGroupGuard,
) -> VisitFuture {
    Box::pin(async move {
        let _guard = guard;

        if depth == 0 {
            return;
        }

        if !ctx.registry.check_and_insert(&url) {
            ctx.stats.record_skipped();
            return;
        }

        let page = match fetch_isolated(Arc::clone(&ctx.fetcher), url.clone()).await {
            Ok(page) => page,
            Err(error) => {
                ctx.report_failure(&url, &error);
                return;
            }
        };

        ctx.report_found(&url, &page.body);

        for link in page.links {
            tracing::debug!("Spawning visit for {} (depth {})", link, depth - 1);
            spawn_visit(&ctx, &wg, link, depth - 1);
        }
    })
}
