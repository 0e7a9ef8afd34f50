//! Lightweight fetcher tests
//!
//! These tests check what actually reaches the server and how redirects
//! are handled.

use pagelens::config::HttpSettings;
use pagelens::fetch::{FetchError, HttpFetcher};
use url::Url;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A page the classifier accepts, with one relative link
fn article_page() -> String {
    let sentence = "Redirected pages still carry plenty of readable text for the extractor. ";
    format!(
        r#"<html><head><title>Landing</title></head><body>
        <p>{}</p><p>{}</p>
        <a href="child">Child page</a>
        </body></html>"#,
        sentence.repeat(3),
        sentence.repeat(2)
    )
}

/// Settings with header values that survive header matching unchanged
fn test_settings() -> HttpSettings {
    HttpSettings {
        timeout_secs: 5,
        user_agent: "pagelens-test/1.0".to_string(),
        accept_language: "de-DE".to_string(),
        ..HttpSettings::default()
    }
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("location", location)
}

/// Mounts `/hop/0` .. `/hop/{hops - 1}` redirecting one step forward, and
/// the article at `/hop/{hops}`
async fn mount_redirect_chain(server: &MockServer, hops: usize) {
    for hop in 0..hops {
        Mock::given(method("GET"))
            .and(path(format!("/hop/{}", hop)))
            .respond_with(redirect_to(&format!("/hop/{}", hop + 1)))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("/hop/{}", hops)))
        .respond_with(html(article_page()))
        .mount(server)
        .await;
}

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn test_sends_browser_like_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "pagelens-test/1.0"))
        .and(header("accept-language", "de-DE"))
        .and(header("connection", "keep-alive"))
        .and(header("upgrade-insecure-requests", "1"))
        .and(header_exists("accept"))
        .and(header_exists("accept-encoding"))
        .respond_with(html(article_page()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&test_settings()).unwrap();
    let document = fetcher.fetch(&url(&server, "/")).await.unwrap();

    assert_eq!(document.title, "Landing");
}

#[tokio::test]
async fn test_follows_short_redirect_chain() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 3).await;

    let fetcher = HttpFetcher::new(&test_settings()).unwrap();
    let document = fetcher.fetch(&url(&server, "/hop/0")).await.unwrap();

    assert_eq!(document.title, "Landing");
}

#[tokio::test]
async fn test_too_many_redirects_is_transport_error() {
    let server = MockServer::start().await;
    mount_redirect_chain(&server, 6).await;

    let fetcher = HttpFetcher::new(&test_settings()).unwrap();
    let error = fetcher.fetch(&url(&server, "/hop/0")).await.unwrap_err();

    assert!(matches!(error, FetchError::Transport(_)), "got {:?}", error);
    assert!(!error.is_configuration());
}

#[tokio::test]
async fn test_links_resolve_against_final_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old/start"))
        .respond_with(redirect_to("/new/section/page"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/section/page"))
        .respond_with(html(article_page()))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&test_settings()).unwrap();
    let document = fetcher.fetch(&url(&server, "/old/start")).await.unwrap();

    let expected = format!("{}/new/section/child", server.uri());
    assert_eq!(document.links.len(), 1);
    assert_eq!(document.links[0].url, expected);
}

#[tokio::test]
async fn test_client_error_is_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(&test_settings()).unwrap();
    let error = fetcher.fetch(&url(&server, "/gone")).await.unwrap_err();

    assert_eq!(error.to_string(), "HTTP_ERROR_410");
}
