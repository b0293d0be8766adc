//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use skein::config::{Config, UserAgentConfig};
use skein::crawler::{Crawler, StopReason};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration with a short rate and time limit
fn create_test_config(seed: String) -> Config {
    let mut config = Config::new(seed);
    config.crawler.rate = Duration::from_millis(10);
    config.crawler.time_limit = Duration::from_secs(5);
    config.user_agent = UserAgentConfig {
        crawler_name: "skein-test".to_string(),
        crawler_version: "1.0".to_string(),
        contact_url: None,
    };
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

/// Serves `/chain/N` pages that each link to `/chain/N+1`
struct Chain {
    served: AtomicUsize,
}

impl Respond for Chain {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.served.fetch_add(1, Ordering::SeqCst);
        let n: u64 = request
            .url
            .path()
            .rsplit('/')
            .next()
            .and_then(|last| last.parse().ok())
            .unwrap_or(0);
        html_page(&format!(r#"<a href="/chain/{}">next</a>"#, n + 1))
    }
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    // Start a mock server
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Index page links with both absolute and relative hrefs
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="{}/page1">Page 1</a> <a href="page2">Page 2</a>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Pages link back to each other and to the index
    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(html_page(r#"<a href="/">Home</a> <a href="/page2#top">Page 2</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html_page(r#"<a href="./page1">Page 1</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url));
    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start()
        .expect("Failed to start crawl");

    let mut discovered = Vec::new();
    while let Some(url) = run.next().await {
        discovered.push(url.to_string());
    }
    let stats = run.finish().await;

    let mut expected = vec![format!("{}/page1", base_url), format!("{}/page2", base_url)];
    expected.sort();
    discovered.sort();
    assert_eq!(discovered, expected);

    assert_eq!(stats.admitted, 3);
    assert_eq!(stats.fetched, 3);
    assert_eq!(stats.failed, 0);
    assert!(stats.duplicates >= 2, "Expected duplicates, got {}", stats.duplicates);
    assert_eq!(stats.stop_reason, Some(StopReason::FrontierExhausted));
    // Each mock's `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_malformed_links_are_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r##"<a href="http://[::1">broken</a>
                <a href="mailto:someone@example.com">mail</a>
                <a href="#top">top</a>
                <a href="javascript:void(0)">js</a>
                <a href="/good">good</a>"##,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/good"))
        .respond_with(html_page("No links here"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url));
    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start()
        .expect("Failed to start crawl");

    let mut discovered = Vec::new();
    while let Some(url) = run.next().await {
        discovered.push(url.to_string());
    }
    let stats = run.finish().await;

    assert_eq!(discovered, vec![format!("{}/good", base_url)]);
    assert_eq!(stats.links_rejected, 4);
    assert_eq!(stats.links_found, 1);
    assert_eq!(stats.fetched, 2);
}

#[tokio::test]
async fn test_failed_fetch_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(r#"<a href="/missing">gone</a> <a href="/ok">ok</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"<a href="/hidden">x</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page(r#"<a href="/deep">deep</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deep"))
        .respond_with(html_page("The end"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url));
    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start()
        .expect("Failed to start crawl");

    let mut discovered = HashSet::new();
    while let Some(url) = run.next().await {
        discovered.insert(url.path().to_string());
    }
    let stats = run.finish().await;

    // The 404 body is never scanned, so /hidden stays unknown
    let expected: HashSet<String> = ["/missing", "/ok", "/deep"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(discovered, expected);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.fetched, 3);
    assert_eq!(stats.stop_reason, Some(StopReason::FrontierExhausted));
}

#[tokio::test]
async fn test_time_limit_stops_endless_site() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(Chain {
            served: AtomicUsize::new(0),
        })
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/chain/0", base_url));
    config.crawler.rate = Duration::from_millis(20);
    config.crawler.time_limit = Duration::from_millis(500);

    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start()
        .expect("Failed to start crawl");

    let mut count = 0u64;
    while run.next().await.is_some() {
        count += 1;
    }
    let stats = run.finish().await;

    assert!(count > 0, "Expected some discoveries");
    // One admission per 20ms over 500ms, plus slack for scheduling
    assert!(count <= 30, "Too many discoveries: {}", count);
    assert_eq!(stats.discovered, count);
    assert_eq!(stats.stop_reason, Some(StopReason::Cancelled));
    assert!(stats.elapsed < Duration::from_secs(3));
}

#[tokio::test]
async fn test_external_cancel_ends_stream() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .respond_with(Chain {
            served: AtomicUsize::new(0),
        })
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/chain/0", base_url));
    config.crawler.time_limit = Duration::from_secs(60);

    let cancel = CancellationToken::new();
    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start_with_cancel(&cancel)
        .expect("Failed to start crawl");

    // Take a few discoveries, then cancel from outside
    for _ in 0..3 {
        assert!(run.next().await.is_some());
    }
    cancel.cancel();

    let remaining = tokio::time::timeout(Duration::from_secs(5), async {
        let mut n = 0;
        while run.next().await.is_some() {
            n += 1;
        }
        n
    })
    .await
    .expect("Stream did not end after cancel");

    assert!(remaining <= 1, "Unexpected discoveries after cancel: {}", remaining);
    let stats = run.finish().await;
    assert_eq!(stats.stop_reason, Some(StopReason::Cancelled));
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "skein-test/1.0"))
        .respond_with(html_page("Hello"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/", base_url));
    let mut run = Crawler::new(&config)
        .expect("Failed to create crawler")
        .start()
        .expect("Failed to start crawl");

    // The seed is never emitted and the page has no links
    assert_eq!(run.next().await, None);
    let stats = run.finish().await;
    assert_eq!(stats.fetched, 1);
    assert_eq!(stats.failed, 0);
}
