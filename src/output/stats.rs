//! Run statistics
//!
//! Counters are updated concurrently by crawl tasks and snapshotted into a
//! `CrawlSummary` once the run has finished.

use crate::crawler::Strategy;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Lock-free counters shared by every task of one run
#[derive(Debug, Default)]
pub struct CrawlStats {
    pages_fetched: AtomicU64,
    fetch_failures: AtomicU64,
    duplicates_skipped: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a link that was not followed because it was already visited
    pub fn record_skipped(&self) {
        self.duplicates_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched.load(Ordering::Relaxed)
    }

    pub fn fetch_failures(&self) -> u64 {
        self.fetch_failures.load(Ordering::Relaxed)
    }

    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped.load(Ordering::Relaxed)
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub strategy: Strategy,
    pub seed: String,
    pub max_depth: u32,

    /// Pages fetched successfully and reported
    pub pages_fetched: u64,

    /// Fetches that failed and were reported as failures
    pub fetch_failures: u64,

    /// Links not followed because their target was already visited
    pub duplicates_skipped: u64,

    /// Size of the visited registry at the end of the run
    pub visited: usize,

    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Builds a summary from the counters of a finished run
    pub fn from_stats(
        strategy: Strategy,
        seed: &str,
        max_depth: u32,
        stats: &CrawlStats,
        visited: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            strategy,
            seed: seed.to_string(),
            max_depth,
            pages_fetched: stats.pages_fetched(),
            fetch_failures: stats.fetch_failures(),
            duplicates_skipped: stats.duplicates_skipped(),
            visited,
            elapsed,
        }
    }

    /// Total number of fetch attempts
    pub fn total_fetches(&self) -> u64 {
        self.pages_fetched + self.fetch_failures
    }
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} crawl of {} (depth {}): {} fetched, {} failed, {} duplicates skipped, {} visited in {:?}",
            self.strategy,
            self.seed,
            self.max_depth,
            self.pages_fetched,
            self.fetch_failures,
            self.duplicates_skipped,
            self.visited,
            self.elapsed
        )
    }
}

/// Prints a run summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!();
    println!("=== Crawl Summary ===");
    println!("  Strategy: {}", summary.strategy);
    println!("  Seed: {}", summary.seed);
    println!("  Max depth: {}", summary.max_depth);
    println!("  Pages fetched: {}", summary.pages_fetched);
    println!("  Fetch failures: {}", summary.fetch_failures);
    println!("  Duplicates skipped: {}", summary.duplicates_skipped);
    println!("  Visited: {}", summary.visited);
    println!("  Elapsed: {:?}", summary.elapsed);
}
