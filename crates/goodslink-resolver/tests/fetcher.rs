//! Integration tests for `ContentFetcher`.
//!
//! Network behaviour runs against a local `wiremock` server; direct reads
//! run against a temporary mirror directory. No real network traffic.

use std::time::Duration;

use goodslink_core::PlatformKind;
use goodslink_resolver::{ContentFetcher, FetchConfig, PageFetcher, ResolveError, SendStrategy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> ContentFetcher {
    ContentFetcher::new(FetchConfig {
        timeout_secs: 5,
        user_agent: "goodslink-test/0.1".to_string(),
        ..FetchConfig::default()
    })
    .expect("failed to build test ContentFetcher")
}

// ---------------------------------------------------------------------------
// Redirects
// ---------------------------------------------------------------------------

#[tokio::test]
async fn follows_redirects_and_records_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/middle"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/middle"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/item", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let page = test_fetcher()
        .fetch(&format!("{}/start", server.uri()), PlatformKind::Jd)
        .await
        .expect("fetch succeeds");

    assert_eq!(page.body, "<html>ok</html>");
    assert_eq!(page.final_url, format!("{}/item", server.uri()));
    assert_eq!(
        page.redirect_chain,
        vec![
            format!("{}/middle", server.uri()),
            format!("{}/item", server.uri())
        ]
    );
    assert_eq!(page.strategy, SendStrategy::NetworkFetch);
}

#[tokio::test]
async fn direct_200_has_empty_chain() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/100.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>x</title>"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_fetcher()
        .fetch(&format!("{}/100.html", server.uri()), PlatformKind::Jd)
        .await
        .expect("fetch succeeds");

    assert!(page.redirect_chain.is_empty());
    assert_eq!(page.final_url, format!("{}/100.html", server.uri()));
}

#[tokio::test]
async fn redirect_loop_stops_at_cap() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .expect(101)
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/loop", server.uri()), PlatformKind::Taobao)
        .await;

    match result {
        Err(ResolveError::FetchFailed { reason, .. }) => {
            assert!(reason.contains("100 redirects"), "reason: {reason}");
        }
        other => panic!("expected FetchFailed, got: {other:?}"),
    }
}

#[tokio::test]
async fn redirect_without_location_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/broken", server.uri()), PlatformKind::Jd)
        .await;

    assert!(
        matches!(result, Err(ResolveError::FetchFailed { .. })),
        "got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Status and transport failures
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_200_final_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/accepted"))
        .respond_with(ResponseTemplate::new(202).set_body_string("later"))
        .mount(&server)
        .await;

    let fetcher = test_fetcher();
    for (route, status) in [("/missing", "404"), ("/accepted", "202")] {
        let result = fetcher
            .fetch(&format!("{}{route}", server.uri()), PlatformKind::Tmall)
            .await;
        match result {
            Err(ResolveError::FetchFailed { reason, .. }) => {
                assert!(reason.contains(status), "reason for {route}: {reason}");
            }
            other => panic!("expected FetchFailed for {route}, got: {other:?}"),
        }
    }
}

#[tokio::test]
async fn no_retry_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_fetcher()
        .fetch(&format!("{}/flaky", server.uri()), PlatformKind::Jd)
        .await;

    assert!(matches!(result, Err(ResolveError::FetchFailed { .. })));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let fetcher = ContentFetcher::new(FetchConfig {
        timeout_secs: 1,
        ..FetchConfig::default()
    })
    .expect("client");

    let result = fetcher
        .fetch(&format!("{}/slow", server.uri()), PlatformKind::Jd)
        .await;

    assert!(
        matches!(result, Err(ResolveError::FetchFailed { .. })),
        "got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Direct reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn share_page_is_read_from_mirror() {
    let mirror = tempfile::tempdir().expect("tempdir");
    let host_dir = mirror.path().join("m.tb.cn");
    std::fs::create_dir_all(&host_dir).expect("mkdir");
    std::fs::write(host_dir.join("h.5Xyz"), "<title>分享</title>").expect("write page");

    let fetcher = ContentFetcher::new(FetchConfig {
        static_mirror_dir: Some(mirror.path().to_path_buf()),
        ..FetchConfig::default()
    })
    .expect("client");

    let page = fetcher
        .fetch("https://m.tb.cn/h.5Xyz?tk=abc", PlatformKind::TaobaoShare)
        .await
        .expect("mirror read succeeds");

    assert_eq!(page.body, "<title>分享</title>");
    assert_eq!(page.strategy, SendStrategy::DirectRead);
    assert_eq!(page.final_url, "https://m.tb.cn/h.5Xyz?tk=abc");
    assert!(page.redirect_chain.is_empty());
}

#[tokio::test]
async fn missing_mirror_file_fails() {
    let mirror = tempfile::tempdir().expect("tempdir");

    let fetcher = ContentFetcher::new(FetchConfig {
        static_mirror_dir: Some(mirror.path().to_path_buf()),
        ..FetchConfig::default()
    })
    .expect("client");

    let result = fetcher
        .fetch("https://m.tb.cn/h.gone", PlatformKind::TaobaoShare)
        .await;

    assert!(
        matches!(result, Err(ResolveError::FetchFailed { .. })),
        "got: {result:?}"
    );
}
