//! Fetch instrumentation

use crate::fetch::{FetchError, FetchedPage, Fetcher};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Wraps another fetcher and records how many times each URL was fetched
///
/// Used to check the at-most-once guarantee of a crawl run.
#[derive(Debug, Default)]
pub struct CountingFetcher<F> {
    inner: F,
    calls: Mutex<HashMap<String, usize>>,
}

impl<F: Fetcher> CountingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Number of times `url` has been passed to the inner fetcher
    pub fn calls(&self, url: &str) -> usize {
        self.lock().get(url).copied().unwrap_or(0)
    }

    /// Total number of fetches across all URLs
    pub fn total_calls(&self) -> usize {
        self.lock().values().sum()
    }

    /// URLs fetched more than once
    pub fn duplicates(&self) -> Vec<String> {
        let mut urls: Vec<String> = self
            .lock()
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, usize>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<F: Fetcher> Fetcher for CountingFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        *self.lock().entry(url.to_string()).or_insert(0) += 1;
        self.inner.fetch(url).await
    }
}
