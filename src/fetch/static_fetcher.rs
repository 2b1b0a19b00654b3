//! Fetcher serving canned pages from memory

use crate::config::PageFixture;
use crate::fetch::{FetchError, FetchedPage, Fetcher};
use std::collections::HashMap;
use std::time::Duration;

/// Fetcher that returns canned results
///
/// Unknown URLs fail with [`FetchError::NotFound`]. An optional latency is
/// applied to every fetch so that concurrent tasks actually interleave.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, FetchedPage>,
    latency: Option<Duration>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page and returns the fetcher, for chained construction
    ///
    /// # Example
    ///
    /// ```
    /// use ripple_crawl::fetch::StaticFetcher;
    ///
    /// let fetcher = StaticFetcher::new()
    ///     .with_page("A", "page a", &["B", "C"])
    ///     .with_page("B", "page b", &[]);
    /// assert_eq!(fetcher.len(), 2);
    /// ```
    pub fn with_page(mut self, url: &str, body: &str, links: &[&str]) -> Self {
        self.insert_page(
            url,
            FetchedPage::new(body, links.iter().map(|l| l.to_string()).collect()),
        );
        self
    }

    /// Sets a delay applied before every fetch completes
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn insert_page(&mut self, url: &str, page: FetchedPage) {
        self.pages.insert(url.to_string(), page);
    }

    /// Builds a fetcher from the `[[page]]` entries of a config file
    pub fn from_pages(pages: &[PageFixture]) -> Self {
        let mut fetcher = Self::new();
        for page in pages {
            fetcher.insert_page(&page.url, FetchedPage::new(&page.body, page.links.clone()));
        }
        fetcher
    }

    /// The four-page `golang.org` fixture used when no pages are configured
    ///
    /// `https://golang.org/cmd/` is linked but deliberately missing, so a
    /// crawl of this fixture always reports one failure.
    pub fn golang_fixture() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                &["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                &[
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                &["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_string(),
            })
    }
}
