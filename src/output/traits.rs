//! Reporter trait and report records
//!
//! A reporter is the side-effect sink of a crawl: it receives one call per
//! successfully fetched page and one per failed fetch.

use crate::fetch::FetchError;

/// Sink for per-page crawl results
///
/// Called concurrently from many tasks; implementations must be thread-safe.
pub trait Reporter: Send + Sync + 'static {
    /// A page was fetched successfully
    fn found(&self, url: &str, body: &str);

    /// A fetch failed; the branch below `url` is not explored
    fn failed(&self, url: &str, error: &FetchError);
}

/// A single crawl result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Found { url: String, body: String },
    Failed { url: String, error: FetchError },
}

impl Report {
    pub fn url(&self) -> &str {
        match self {
            Self::Found { url, .. } | Self::Failed { url, .. } => url,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}
