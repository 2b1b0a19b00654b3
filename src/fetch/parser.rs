//! HTML parsing for the HTTP fetcher
//!
//! Extracts the page title and the outbound links of a fetched document.

use scraper::{Html, Selector};
use url::Url;

/// Title and links extracted from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Trimmed contents of the `<title>` tag, if non-empty
    pub title: Option<String>,

    /// Absolute http(s) links in document order
    pub links: Vec<String>,
}

/// Parses HTML content and extracts its title and outbound links
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links
/// - Anything that does not resolve to http or https
///
/// Relative links are resolved against `base_url`. Duplicates are kept.
///
/// # Example
///
/// ```
/// use ripple_crawl::fetch::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title.as_deref(), Some("Test"));
/// assert_eq!(parsed.links, vec!["https://example.com/page"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(absolute_url) = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url))
            {
                links.push(absolute_url);
            }
        }
    }

    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        links.extend(
            document
                .select(&canonical_selector)
                .filter_map(|element| element.value().attr("href"))
                .filter_map(|href| resolve_link(href, base_url)),
        );
    }

    links
}

/// Resolves an href to an absolute http(s) URL, or `None` if it is skipped
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];
    if SKIPPED_SCHEMES.iter().any(|scheme| href.starts_with(scheme)) {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url.to_string()),
        _ => None,
    }
}
