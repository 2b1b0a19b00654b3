//! Integration tests for the crawler
//!
//! Every scenario runs against both orchestration strategies. The HTTP tests
//! use wiremock to serve a small site and crawl it end-to-end.

use ripple_crawl::config::{parse_config, FetcherKind, HttpConfig};
use ripple_crawl::crawler::{crawl, Strategy};
use ripple_crawl::fetch::{
    CountingFetcher, FetchError, FetchedPage, Fetcher, HttpFetcher, StaticFetcher,
};
use ripple_crawl::output::{CrawlSummary, MemoryReporter, Report};
use ripple_crawl::state::VisitedRegistry;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STRATEGIES: [Strategy; 2] = [Strategy::Channel, Strategy::WaitGroup];

struct Outcome {
    summary: CrawlSummary,
    reporter: Arc<MemoryReporter>,
    fetcher: Arc<CountingFetcher<StaticFetcher>>,
    registry: Arc<VisitedRegistry>,
}

/// Runs a crawl over canned pages, failing the test if it does not finish
async fn run_static(
    strategy: Strategy,
    fetcher: StaticFetcher,
    seed: &str,
    max_depth: u32,
) -> Outcome {
    let fetcher = Arc::new(CountingFetcher::new(fetcher));
    let reporter = Arc::new(MemoryReporter::new());
    let registry = Arc::new(VisitedRegistry::new());

    let summary = tokio::time::timeout(
        Duration::from_secs(10),
        crawl(
            strategy,
            seed,
            max_depth,
            Arc::clone(&fetcher),
            Arc::clone(&reporter),
            Arc::clone(&registry),
        ),
    )
    .await
    .unwrap_or_else(|_| panic!("{} crawl did not terminate", strategy));

    Outcome {
        summary,
        reporter,
        fetcher,
        registry,
    }
}

fn diamond() -> StaticFetcher {
    StaticFetcher::new()
        .with_page("seed", "seed", &["a", "b"])
        .with_page("a", "a", &["c"])
        .with_page("b", "b", &["c"])
        .with_page("c", "c", &[])
        .with_latency(Duration::from_millis(10))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_diamond_fetches_shared_node_once() {
    for strategy in STRATEGIES {
        let outcome = run_static(strategy, diamond(), "seed", 5).await;

        assert_eq!(outcome.fetcher.calls("c"), 1, "strategy {}", strategy);
        assert!(outcome.fetcher.duplicates().is_empty(), "strategy {}", strategy);
        assert_eq!(outcome.reporter.count_for("c"), 1, "strategy {}", strategy);
        assert_eq!(
            outcome.reporter.found_urls(),
            vec!["a", "b", "c", "seed"],
            "strategy {}",
            strategy
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_dense_graph_fetches_each_node_once() {
    // Every node links to every other node
    let nodes: Vec<String> = (0..12).map(|i| format!("n{}", i)).collect();
    let refs: Vec<&str> = nodes.iter().map(String::as_str).collect();

    for strategy in STRATEGIES {
        let mut fetcher = StaticFetcher::new().with_latency(Duration::from_millis(2));
        for node in &nodes {
            fetcher = fetcher.with_page(node, node, &refs);
        }

        let outcome = run_static(strategy, fetcher, "n0", 4).await;

        assert!(outcome.fetcher.duplicates().is_empty(), "strategy {}", strategy);
        assert_eq!(outcome.fetcher.total_calls(), nodes.len(), "strategy {}", strategy);
        assert_eq!(outcome.summary.pages_fetched, nodes.len() as u64);
    }
}

#[tokio::test]
async fn test_depth_bound_respected() {
    let chain = StaticFetcher::new()
        .with_page("n0", "n0", &["n1"])
        .with_page("n1", "n1", &["n2"])
        .with_page("n2", "n2", &["n3"])
        .with_page("n3", "n3", &["n4"])
        .with_page("n4", "n4", &[]);

    for strategy in STRATEGIES {
        let outcome = run_static(strategy, chain.clone(), "n0", 3).await;

        // Nodes at path length < max_depth are explored
        assert_eq!(
            outcome.reporter.found_urls(),
            vec!["n0", "n1", "n2"],
            "strategy {}",
            strategy
        );
        assert_eq!(outcome.fetcher.calls("n3"), 0, "strategy {}", strategy);
        assert_eq!(outcome.fetcher.calls("n4"), 0, "strategy {}", strategy);
    }
}

#[tokio::test]
async fn test_cycle_terminates() {
    let cycle = StaticFetcher::new()
        .with_page("seed", "seed", &["a"])
        .with_page("a", "a", &["seed"]);

    for strategy in STRATEGIES {
        let outcome = run_static(strategy, cycle.clone(), "seed", 10).await;

        assert_eq!(outcome.reporter.count_for("seed"), 1, "strategy {}", strategy);
        assert_eq!(outcome.reporter.count_for("a"), 1, "strategy {}", strategy);
        assert_eq!(outcome.reporter.len(), 2, "strategy {}", strategy);
    }
}

#[tokio::test]
async fn test_self_loop_terminates() {
    let fetcher = StaticFetcher::new().with_page("seed", "seed", &["seed", "seed"]);

    for strategy in STRATEGIES {
        let outcome = run_static(strategy, fetcher.clone(), "seed", 10).await;
        assert_eq!(outcome.fetcher.calls("seed"), 1, "strategy {}", strategy);
    }
}

#[tokio::test]
async fn test_failure_isolated_to_branch() {
    let fetcher = StaticFetcher::new()
        .with_page("seed", "seed", &["good", "bad"])
        .with_page("good", "good", &["deeper"])
        .with_page("deeper", "deeper", &[]);

    for strategy in STRATEGIES {
        let outcome = run_static(strategy, fetcher.clone(), "seed", 4).await;

        assert_eq!(
            outcome.reporter.found_urls(),
            vec!["deeper", "good", "seed"],
            "strategy {}",
            strategy
        );
        assert_eq!(outcome.reporter.failed_urls(), vec!["bad"], "strategy {}", strategy);

        let failure = outcome
            .reporter
            .reports()
            .into_iter()
            .find(|r| !r.is_found())
            .unwrap();
        assert_eq!(
            failure,
            Report::Failed {
                url: "bad".to_string(),
                error: FetchError::NotFound {
                    url: "bad".to_string()
                },
            }
        );
        assert_eq!(outcome.summary.fetch_failures, 1);
        assert_eq!(outcome.summary.pages_fetched, 3);
    }
}

/// Serves "seed" -> ["broken", "fine"] and panics when asked for "broken"
struct PanicsOnBroken;

impl Fetcher for PanicsOnBroken {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match url {
            "broken" => panic!("fetcher bug on {}", url),
            "seed" => Ok(FetchedPage::new(
                "seed",
                vec!["broken".to_string(), "fine".to_string()],
            )),
            other => Ok(FetchedPage::new(other, Vec::new())),
        }
    }
}

#[tokio::test]
async fn test_panicking_fetch_reported_alike_by_both_strategies() {
    for strategy in STRATEGIES {
        let reporter = Arc::new(MemoryReporter::new());
        let summary = tokio::time::timeout(
            Duration::from_secs(10),
            crawl(
                strategy,
                "seed",
                3,
                Arc::new(PanicsOnBroken),
                Arc::clone(&reporter),
                Arc::new(VisitedRegistry::new()),
            ),
        )
        .await
        .unwrap_or_else(|_| panic!("{} crawl did not terminate", strategy));

        assert_eq!(reporter.found_urls(), vec!["fine", "seed"], "strategy {}", strategy);
        assert_eq!(reporter.failed_urls(), vec!["broken"], "strategy {}", strategy);
        assert!(
            matches!(
                reporter.reports().iter().find(|r| !r.is_found()),
                Some(Report::Failed {
                    error: FetchError::Aborted { .. },
                    ..
                })
            ),
            "strategy {}",
            strategy
        );
        assert_eq!(summary.fetch_failures, 1, "strategy {}", strategy);
    }
}

#[tokio::test]
async fn test_reference_scenario() {
    let fetcher = StaticFetcher::new()
        .with_page("A", "page A", &["B", "C"])
        .with_page("B", "page B", &["A", "D"])
        .with_page("C", "page C", &[])
        .with_page("D", "page D", &[]);

    for strategy in STRATEGIES {
        let outcome = run_static(strategy, fetcher.clone(), "A", 3).await;

        assert_eq!(
            outcome.reporter.found_urls(),
            vec!["A", "B", "C", "D"],
            "strategy {}",
            strategy
        );
        for url in ["A", "B", "C", "D"] {
            assert_eq!(outcome.reporter.count_for(url), 1, "{} via {}", url, strategy);
        }
        assert!(outcome.reporter.failed_urls().is_empty());
        assert_eq!(outcome.registry.snapshot(), vec!["A", "B", "C", "D"]);
        assert!(outcome.reporter.reports().contains(&Report::Found {
            url: "D".to_string(),
            body: "page D".to_string(),
        }));
    }
}

#[tokio::test]
async fn test_zero_depth_reports_nothing() {
    for strategy in STRATEGIES {
        let outcome = run_static(strategy, diamond(), "seed", 0).await;

        assert!(outcome.reporter.is_empty(), "strategy {}", strategy);
        assert_eq!(outcome.fetcher.total_calls(), 0, "strategy {}", strategy);
        assert!(outcome.registry.is_empty(), "strategy {}", strategy);
        assert_eq!(outcome.summary.total_fetches(), 0);
    }
}

#[tokio::test]
async fn test_golang_fixture_matches_between_strategies() {
    let mut found = Vec::new();
    for strategy in STRATEGIES {
        let outcome = run_static(
            strategy,
            StaticFetcher::golang_fixture(),
            "https://golang.org/",
            4,
        )
        .await;
        found.push(outcome.reporter.found_urls());
        assert_eq!(
            outcome.reporter.failed_urls(),
            vec!["https://golang.org/cmd/"]
        );
    }
    assert_eq!(found[0], found[1]);
}

#[tokio::test]
async fn test_crawl_from_config_pages() {
    let config = parse_config(
        r#"
[crawler]
seed = "https://example.com/"
max-depth = 2
strategy = "wg"

[[page]]
url = "https://example.com/"
body = "Home"
links = ["https://example.com/about", "https://example.com/gone"]

[[page]]
url = "https://example.com/about"
body = "About"
links = ["https://example.com/deep"]
"#,
    )
    .unwrap();
    assert_eq!(config.fetcher.kind, FetcherKind::Static);

    let outcome = run_static(
        config.crawler.strategy,
        StaticFetcher::from_pages(&config.pages),
        &config.crawler.seed,
        config.crawler.max_depth,
    )
    .await;

    assert_eq!(outcome.summary.strategy, Strategy::WaitGroup);
    assert_eq!(
        outcome.reporter.found_urls(),
        vec!["https://example.com/", "https://example.com/about"]
    );
    assert_eq!(
        outcome.reporter.failed_urls(),
        vec!["https://example.com/gone"]
    );
    assert_eq!(outcome.fetcher.calls("https://example.com/deep"), 0);
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into_bytes(), "text/html")
}

/// Serves: / -> {/page1, /page2}, /page1 -> {/, /page2}, /page2 -> {/missing}
async fn mount_site(server: &MockServer) {
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            </body></html>"#,
            base
        )))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html(
            r#"<html><head><title>Page 1</title></head><body>
            <a href="/">Home</a>
            <a href="/page2">Page 2</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html(
            r#"<html><head><title>Page 2</title></head><body>
            <a href="/missing">Gone</a>
            </body></html>"#
                .to_string(),
        ))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_crawl_end_to_end() {
    for strategy in STRATEGIES {
        let server = MockServer::start().await;
        mount_site(&server).await;
        let base = server.uri();

        let fetcher = Arc::new(HttpFetcher::new(&HttpConfig::default()).unwrap());
        let reporter = Arc::new(MemoryReporter::new());

        let summary = tokio::time::timeout(
            Duration::from_secs(10),
            crawl(
                strategy,
                &format!("{}/", base),
                5,
                fetcher,
                Arc::clone(&reporter),
                Arc::new(VisitedRegistry::new()),
            ),
        )
        .await
        .expect("HTTP crawl did not terminate");

        assert_eq!(
            reporter.found_urls(),
            vec![
                format!("{}/", base),
                format!("{}/page1", base),
                format!("{}/page2", base),
            ],
            "strategy {}",
            strategy
        );
        assert_eq!(reporter.failed_urls(), vec![format!("{}/missing", base)]);
        assert!(reporter.reports().contains(&Report::Found {
            url: format!("{}/page1", base),
            body: "Page 1".to_string(),
        }));
        assert_eq!(summary.pages_fetched, 3);
        assert_eq!(summary.fetch_failures, 1);

        // Each page was requested exactly once; checked by the mocks' expectations
        server.verify().await;
    }
}
