//! Fetch capability used by the crawl orchestrators
//!
//! This module defines the `Fetcher` trait, the only data boundary of the
//! crawler, along with its implementations:
//! - `StaticFetcher`: canned in-memory pages
//! - `HttpFetcher`: real HTTP requests with HTML link extraction
//! - `CountingFetcher`: a wrapper recording how often each URL is fetched

mod counting;
mod http;
mod parser;
mod static_fetcher;

pub use counting::CountingFetcher;
pub use http::{build_http_client, fetch_page, HttpFetcher};
pub use parser::{parse_html, ParsedPage};
pub use static_fetcher::StaticFetcher;

use std::future::Future;
use thiserror::Error;

/// Content and outbound links of a successfully fetched page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedPage {
    /// Page content as reported to the output sink
    pub body: String,

    /// Outbound URLs in document order, not deduplicated
    pub links: Vec<String>,
}

impl FetchedPage {
    pub fn new(body: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            body: body.into(),
            links,
        }
    }
}

/// Failure to fetch a single page
///
/// Fetch failures are local to one branch of the crawl: they are reported
/// and that branch stops expanding. They are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("not found: {url}")]
    NotFound { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    /// The fetch task ended without producing a result (it panicked)
    #[error("fetch of {url} aborted: {message}")]
    Aborted { url: String, message: String },
}

impl FetchError {
    /// Returns the URL the failed fetch was for
    pub fn url(&self) -> &str {
        match self {
            Self::NotFound { url }
            | Self::Status { url, .. }
            | Self::Network { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Aborted { url, .. } => url,
        }
    }
}

/// Source of page content and outbound links
///
/// Implementations must be deterministic for a given URL within one run and
/// must report unknown or unreachable URLs as a `FetchError` rather than
/// panicking. Links are returned as found; deduplication is the crawler's job.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}
