//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use ripple_crawl::config::Config;
use ripple_crawl::crawler::Coordinator;
use ripple_crawl::FetchError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with short timeouts
fn create_test_config(workers: u32) -> Config {
    let mut config = Config::default();
    config.crawler.workers = workers;
    config.crawler.request_timeout = 5;
    config.crawler.connect_timeout = 2;
    config
}

/// Mounts an HTML page at the given path
async fn mount_html(server: &MockServer, at: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// The server root, as the crawler keys it
fn seed_of(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r##"<html><body>
            <a href="/a">A</a>
            <a href="/b">B</a>
            <a href="/c">C</a>
            <a href="/">Home</a>
            <a href="#top">Top</a>
            <a href="mailto:someone@example.com">Mail</a>
        </body></html>"##,
    )
    .await;
    mount_html(
        &mock_server,
        "/a",
        r#"<html><body><a href="/">Home</a><a href="/b">B</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/b",
        r#"<html><body><a href="/a">A</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/c"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"ok\":true}", "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let coordinator =
        Coordinator::new(create_test_config(4), &seed).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    // Seed, /a, /b and /c, each exactly once
    assert_eq!(report.urls_crawled, 4);
    assert_eq!(report.urls_queued, 0);
    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.failure_count(), 0);
    assert!(!report.timed_out);

    assert!(report.page(&seed).is_some());
    assert!(report.page(&format!("{}/a", mock_server.uri())).is_some());
    assert!(report.page(&format!("{}/b", mock_server.uri())).is_some());
    assert!(report.page(&format!("{}/c", mock_server.uri())).is_none());
}

#[tokio::test]
async fn test_keywords_and_meta_description() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<html>
            <head><meta name="description" content="All about crawlers"></head>
            <body>
                <p>Crawler crawler CRAWLER. The engine, the engine!</p>
                <p>Spider</p>
            </body>
        </html>"#,
    )
    .await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    let page = report.page(&seed).expect("Seed page not analyzed");
    assert_eq!(page.meta_description(), "All about crawlers");
    assert_eq!(
        page.key_words(),
        &[
            ("crawler".to_string(), 3),
            ("engine".to_string(), 2),
            ("spider".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_single_redirect_is_followed() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(&mock_server, "/", r#"<html><body><a href="/old">Old</a></body></html>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/new",
        r#"<html><body><p>Relocated content</p><a href="/next">Next</a></body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/next", "<html><body>End</body></html>").await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    let new_url = format!("{}/new", mock_server.uri());
    let page = report.page(&new_url).expect("Redirect target not analyzed");
    assert_eq!(page.key_words()[0].0, "relocated");
    assert!(report.page(&format!("{}/old", mock_server.uri())).is_none());

    // Links on the target resolve against the final URL
    assert!(report.page(&format!("{}/next", mock_server.uri())).is_some());
    // Seed, /old, /new (reached by the redirect) and /next
    assert_eq!(report.urls_crawled, 4);
}

#[tokio::test]
async fn test_second_redirect_not_followed() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(&mock_server, "/", r#"<html><body><a href="/old">Old</a></body></html>"#).await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/mid"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mid"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn test_redirect_target_crawled_once() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/old">Old</a><a href="/new">New</a></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/new", "<html><body>Destination</body></html>").await;

    let report = Coordinator::new(create_test_config(3), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    let new_url = format!("{}/new", mock_server.uri());
    let copies = report
        .pages
        .iter()
        .filter(|page| page.url() == new_url)
        .count();
    assert_eq!(copies, 1);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.urls_crawled, 3);
}

#[tokio::test]
async fn test_overlong_redirect_target_never_requested() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    let long_path = format!("/{}", "x".repeat(250));
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", long_path.as_str()))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(long_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.failures.get(&FetchError::InvalidUrl), Some(&1));
}

#[tokio::test]
async fn test_invalid_utf8_body_is_encoding_failure() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    let mut body = b"<html><body>Valid words here ".to_vec();
    body.extend_from_slice(&[0xff, 0xfe, 0xfd]);
    body.extend_from_slice(b" more</body></html>");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(report.pages.is_empty());
    assert_eq!(report.failures.get(&FetchError::EncodingFailure), Some(&1));
    assert_eq!(report.analysis_failures, 0);
}

#[tokio::test]
async fn test_non_document_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/manual.pdf">Manual</a>
            <a href="/photo.JPG">Photo</a>
            <a href="?page=2">Next</a>
            <a href="//cdn.example.com/lib">CDN</a>
        </body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photo.JPG"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.urls_crawled, 1);
    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_empty_body_and_missing_page() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/blank">Blank</a><a href="/gone">Gone</a></body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/blank", "  \n\t ").await;
    // "/gone" is unmounted; wiremock answers 404

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.urls_crawled, 3);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.empty_pages, 1);
    assert_eq!(report.ignored, 1);
    assert_eq!(report.bad_pages(), 1);
}

#[tokio::test]
async fn test_unreachable_link_is_connection_failure() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let html = format!(
        r#"<html><body><a href="http://127.0.0.1:{}/down">Down</a></body></html>"#,
        port
    );
    mount_html(&mock_server, "/", &html).await;

    let report = Coordinator::new(create_test_config(2), &seed)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.urls_crawled, 2);
    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.failures.get(&FetchError::ConnectionFailure), Some(&1));
}

#[tokio::test]
async fn test_max_pages_caps_dispatch() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    let links: String = (1..=9)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_html(&mock_server, "/", &format!("<html><body>{}</body></html>", links)).await;
    for i in 1..=9 {
        mount_html(&mock_server, &format!("/p{}", i), "<html><body>Leaf</body></html>").await;
    }

    let mut config = create_test_config(3);
    config.crawler.max_pages = Some(3);

    let report = Coordinator::new(config, &seed).unwrap().run().await.unwrap();

    assert_eq!(report.urls_crawled, 3);
    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.urls_queued, 7);
}

#[tokio::test]
async fn test_crawl_deadline_stops_workers() {
    let mock_server = MockServer::start().await;
    let seed = seed_of(&mock_server);

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Slow</body></html>", "text/html")
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2);
    config.crawler.crawl_deadline = Some(1);

    let report = Coordinator::new(config, &seed).unwrap().run().await.unwrap();

    assert!(report.timed_out);
    assert_eq!(report.urls_crawled, 1);
    assert!(report.pages.is_empty());
}
