use crate::crawler::Strategy;
use serde::Deserialize;

/// Seed used when neither the config file nor the command line names one
pub const DEFAULT_SEED: &str = "https://golang.org/";

/// Depth used when neither the config file nor the command line sets one
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Main configuration structure for Ripple-Crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Canned pages served by the static fetcher
    #[serde(default, rename = "page")]
    pub pages: Vec<PageFixture>,
}

/// Crawl run configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// URL the crawl starts from
    #[serde(default = "default_seed")]
    pub seed: String,

    /// Number of levels to explore; 0 fetches nothing
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Orchestration strategy: "channel" or "wg"
    #[serde(default)]
    pub strategy: Strategy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: Strategy::default(),
        }
    }
}

/// Which fetch capability backs the crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    /// Canned pages from `[[page]]`, or the built-in fixture if there are none
    #[default]
    Static,
    /// Real HTTP requests
    Http,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FetcherConfig {
    #[serde(default)]
    pub kind: FetcherKind,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(
        rename = "connect-timeout-secs",
        default = "default_connect_timeout_secs"
    )]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// A canned page for the static fetcher
#[derive(Debug, Clone, Deserialize)]
pub struct PageFixture {
    pub url: String,
    pub body: String,
    #[serde(default)]
    pub links: Vec<String>,
}

fn default_seed() -> String {
    DEFAULT_SEED.to_string()
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_user_agent() -> String {
    format!("ripple-crawl/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}
