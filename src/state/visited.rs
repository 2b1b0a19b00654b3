//! Visited registry shared by every crawl task
//!
//! The registry is an append-only set of URLs guarded by a single mutex.
//! Both the check and the insert go through the same lock.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe set of URLs that have already been dispatched for fetching
///
/// One registry is created per crawl run and shared with every task through
/// an `Arc`. Entries are never removed.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    set: Mutex<HashSet<String>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether `url` has already been recorded
    ///
    /// This is atomic on its own, but a `check` followed by an `insert` is
    /// not: another task may record the same URL in between. Use
    /// [`check_and_insert`](Self::check_and_insert) to reserve a URL.
    pub fn check(&self, url: &str) -> bool {
        let exists = self.lock().contains(url);
        if exists {
            tracing::debug!("URL already visited: {}", url);
        }
        exists
    }

    /// Records `url` as visited
    ///
    /// Inserting a URL that is already present has no observable effect.
    pub fn insert(&self, url: &str) {
        let mut set = self.lock();
        if !set.contains(url) {
            set.insert(url.to_string());
        }
    }

    /// Atomically records `url` and reports whether this call added it
    ///
    /// # Returns
    ///
    /// * `true` - `url` was absent and is now reserved by the caller
    /// * `false` - `url` was already present
    pub fn check_and_insert(&self, url: &str) -> bool {
        let mut set = self.lock();
        if set.contains(url) {
            tracing::debug!("URL already visited: {}", url);
            false
        } else {
            set.insert(url.to_string())
        }
    }

    /// Returns true if `url` is present, without logging
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns every recorded URL in sorted order
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    // The set is append-only, so a panic while holding the lock cannot leave
    // it half-updated; recover the guard instead of propagating the poison.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.set.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
