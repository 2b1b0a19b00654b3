use crate::fetch::FetchError;
use crate::output::{Report, Reporter};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Collects every report in memory, in the order they arrived
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<Report>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all reports received so far
    pub fn reports(&self) -> Vec<Report> {
        self.lock().clone()
    }

    /// URLs reported as found, sorted
    pub fn found_urls(&self) -> Vec<String> {
        self.urls_where(Report::is_found)
    }

    /// URLs reported as failed, sorted
    pub fn failed_urls(&self) -> Vec<String> {
        self.urls_where(|report| !report.is_found())
    }

    /// How many reports (of either kind) mention `url`
    pub fn count_for(&self, url: &str) -> usize {
        self.lock().iter().filter(|r| r.url() == url).count()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn urls_where(&self, predicate: impl Fn(&Report) -> bool) -> Vec<String> {
        let mut urls: Vec<String> = self
            .lock()
            .iter()
            .filter(|r| predicate(*r))
            .map(|r| r.url().to_string())
            .collect();
        urls.sort();
        urls
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Report>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Reporter for MemoryReporter {
    fn found(&self, url: &str, body: &str) {
        self.lock().push(Report::Found {
            url: url.to_string(),
            body: body.to_string(),
        });
    }

    fn failed(&self, url: &str, error: &FetchError) {
        self.lock().push(Report::Failed {
            url: url.to_string(),
            error: error.clone(),
        });
    }
}
