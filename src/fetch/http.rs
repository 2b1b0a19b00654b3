//! HTTP fetcher implementation
//!
//! This module handles the real network fetch:
//! - Building an HTTP client with the configured user agent and timeouts
//! - GET requests with Content-Type checking
//! - Classifying HTTP and network errors into `FetchError`
//! - Extracting outbound links from the returned HTML

use crate::config::HttpConfig;
use crate::fetch::parser::parse_html;
use crate::fetch::{FetchError, FetchedPage, Fetcher};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the `[http]` section of the config
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Client built successfully
    /// * `Err(RippleError::Http)` - The TLS backend or client could not be initialized
    pub fn new(config: &HttpConfig) -> crate::Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        fetch_page(&self.client, url).await
    }
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// Redirects are followed by reqwest's default policy; the final URL is used
/// as the base for resolving relative links.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and extracts its outbound links
///
/// # Error Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 404 | `NotFound` |
/// | Other non-2xx | `Status` |
/// | Timeout / connection failure / body read error | `Network` |
/// | Content-Type not HTML | `ContentMismatch` |
///
/// On success the reported body is the page title when there is one, and the
/// raw HTML otherwise.
pub async fn fetch_page(client: &Client, url: &str) -> Result<FetchedPage, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| network_error(url, &e))?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !content_type.contains("text/html") {
        return Err(FetchError::ContentMismatch {
            url: url.to_string(),
            content_type,
        });
    }

    let final_url = response.url().clone();
    let html = response.text().await.map_err(|e| network_error(url, &e))?;

    let parsed = parse_html(&html, &final_url);
    tracing::trace!("{} links extracted from {}", parsed.links.len(), url);

    Ok(FetchedPage {
        body: parsed.title.unwrap_or(html),
        links: parsed.links,
    })
}

fn network_error(url: &str, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
