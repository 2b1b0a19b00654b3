//! Ripple-Crawl: a concurrent, depth-bounded link crawler
//!
//! This crate walks the graph of pages reachable from a seed URL, fetching
//! each page at most once, using one of two orchestration strategies:
//! a channel-based coordinator or a recursive fan-out over a wait group.

pub mod config;
pub mod crawler;
pub mod fetch;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for Ripple-Crawl setup operations
///
/// A crawl run itself never fails; fetch failures are reported per page.
#[derive(Debug, Error)]
pub enum RippleError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, RippleError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, run_channel_crawl, run_wait_group_crawl, Strategy};
pub use fetch::{FetchError, FetchedPage, Fetcher, HttpFetcher, StaticFetcher};
pub use output::{ConsoleReporter, CrawlSummary, MemoryReporter, Report, Reporter};
pub use state::VisitedRegistry;
