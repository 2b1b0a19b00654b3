use crate::fetch::FetchError;
use crate::output::Reporter;

/// Prints one line per page to stdout
///
/// Successful fetches print as `found: <url> "<body>"`, failures print the
/// error message.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn found(&self, url: &str, body: &str) {
        println!("{}", format_found(url, body));
    }

    fn failed(&self, _url: &str, error: &FetchError) {
        println!("{}", error);
    }
}

fn format_found(url: &str, body: &str) -> String {
    format!("found: {} {:?}", url, body)
}
