//! End-to-end scrape tests
//!
//! These tests run the full pipeline: validation, the lightweight fetch,
//! escalation to the rendered fetch, failure classification and the
//! optional summary.

use async_trait::async_trait;
use pagelens::config::{Config, RuntimeEnvironment};
use pagelens::fetch::{BrowserLauncher, BrowserSession, FetchError};
use pagelens::summarize::{HttpSummarizer, RATE_LIMITED_SUMMARY, UNAVAILABLE_SUMMARY};
use pagelens::{ErrorType, FetchMethod, ScrapeRequest, Scraper};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A page the classifier accepts: enough text, paragraphs and links
fn article_page(title: &str) -> String {
    let sentence = "Structured content is easier to reuse when every section is clearly marked. ";
    format!(
        r#"<html><head><title>{title}</title>
        <meta name="description" content="An article used by the integration tests"></head>
        <body>
        <p>{a}</p>
        <p>{b}</p>
        <ul><li>First point</li><li>Second point</li></ul>
        <a href="/about">About us</a>
        <a href="https://other.example/docs">Docs</a>
        </body></html>"#,
        title = title,
        a = sentence.repeat(3),
        b = sentence.repeat(2),
    )
}

/// A script-only shell that the lightweight fetcher must reject
const APP_SHELL: &str =
    r#"<html><head><title>App</title></head><body><div id="root"></div></body></html>"#;

const CHALLENGE_PAGE: &str = "<html><body><h1>Access denied</h1></body></html>";

const LOGIN_PAGE: &str = r#"<html><body><form>
    <input type="text" name="user"><input type="password" name="pass">
    </form></body></html>"#;

/// Creates a configuration with short waits suitable for tests
fn create_test_config(summarizer_endpoint: &str) -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 5;
    config.http.deadline_secs = 5;
    config.browser.deadline_secs = 1;
    config.browser.max_attempts = 3;
    config.browser.attempt_delay_ms = 10;
    config.browser.attempt_delay_step_ms = 5;
    config.summarizer.endpoint = summarizer_endpoint.to_string();
    config.summarizer.timeout_secs = 5;
    config
}

/// How the scripted browser behaves
#[derive(Clone)]
enum Script {
    /// Serves these documents in order, repeating the last one
    Pages(Vec<String>),
    /// Never finishes navigating
    Stall,
    /// Fails to launch with this error
    LaunchFails(fn() -> FetchError),
}

struct ScriptedLauncher {
    script: Script,
    launches: Arc<AtomicUsize>,
}

impl ScriptedLauncher {
    fn new(script: Script) -> (Arc<Self>, Arc<AtomicUsize>) {
        let launches = Arc::new(AtomicUsize::new(0));
        let launcher = Arc::new(Self {
            script,
            launches: launches.clone(),
        });
        (launcher, launches)
    }
}

#[async_trait]
impl BrowserLauncher for ScriptedLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, FetchError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::LaunchFails(error) => Err(error()),
            script => Ok(Box::new(ScriptedSession {
                script: script.clone(),
                served: 0,
            })),
        }
    }
}

struct ScriptedSession {
    script: Script,
    served: usize,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn navigate(&mut self, _url: &Url, _timeout: Duration) -> Result<(), FetchError> {
        if let Script::Stall = self.script {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(())
    }

    async fn wait_for_text(&mut self, _min_chars: usize, _timeout: Duration) -> bool {
        true
    }

    async fn wait_for_network_idle(&mut self, _idle_window: Duration, _timeout: Duration) -> bool {
        true
    }

    async fn content(&mut self) -> Result<String, FetchError> {
        match &self.script {
            Script::Pages(pages) => {
                let index = self.served.min(pages.len() - 1);
                self.served += 1;
                Ok(pages[index].clone())
            }
            _ => Err(FetchError::Browser("no page loaded".to_string())),
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), FetchError> {
        Ok(())
    }

    async fn close(self: Box<Self>) {}
}

/// Builds a scraper whose summarizer points at the mock server
fn create_scraper(server: &MockServer, script: Script) -> (Scraper, Arc<AtomicUsize>) {
    let config = create_test_config(&format!("{}/summarize", server.uri()));
    let (launcher, launches) = ScriptedLauncher::new(script);
    let summarizer = HttpSummarizer::new(&config.summarizer).expect("summarizer");
    let scraper = Scraper::new(&config, launcher, Arc::new(summarizer)).expect("scraper");
    (scraper, launches)
}

async fn mount_page(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_plain_http_success() {
    let server = MockServer::start().await;
    mount_page(&server, "/article", 200, &article_page("Hello")).await;

    let (scraper, launches) = create_scraper(&server, Script::Pages(vec![]));
    let url = format!("{}/article", server.uri());
    let result = scraper.scrape(&ScrapeRequest::new(&url)).await.unwrap();

    assert_eq!(result.method_used, FetchMethod::Http);
    assert_eq!(result.url, url);
    assert_eq!(result.document.title, "Hello");
    assert_eq!(
        result.document.description,
        "An article used by the integration tests"
    );
    assert_eq!(result.document.paragraphs.len(), 2);
    assert!(result.summary.is_none());

    // Relative links resolve against the page URL
    let about = format!("{}/about", server.uri());
    assert!(result.document.links.iter().any(|link| link.url == about));

    assert_eq!(launches.load(Ordering::SeqCst), 0, "browser must not start");
}

#[tokio::test]
async fn test_success_serializes_as_flat_record() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Flat")).await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let result = scraper
        .scrape(&ScrapeRequest::new(server.uri()))
        .await
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["methodUsed"], "HTTP");
    assert_eq!(json["title"], "Flat");
    assert!(json["paragraphs"].is_array());
    assert!(json["uniqueComponents"].is_array());
    assert!(json["techStack"].is_array());
    assert!(json["scrapedAt"].is_string());
    assert!(json.get("summary").is_none());
    assert!(json.get("bodyTextLength").is_none());
}

#[tokio::test]
async fn test_invalid_urls_are_rejected_before_fetching() {
    let server = MockServer::start().await;
    let (scraper, launches) = create_scraper(&server, Script::Pages(vec![]));

    let failure = scraper
        .scrape(&ScrapeRequest::new("not a url"))
        .await
        .unwrap_err();
    assert_eq!(failure.error_type, ErrorType::InvalidUrl);
    assert_eq!(failure.status(), 400);
    assert_eq!(failure.url, "not a url");

    let failure = scraper
        .scrape(&ScrapeRequest::new("ftp://files.example.com/a.txt"))
        .await
        .unwrap_err();
    assert_eq!(failure.error_type, ErrorType::InvalidUrlProtocol);
    assert_eq!(failure.status(), 400);
    assert!(failure.details.is_none());

    assert_eq!(launches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_app_shell_escalates_to_browser() {
    let server = MockServer::start().await;
    mount_page(&server, "/app", 200, APP_SHELL).await;

    let (scraper, launches) =
        create_scraper(&server, Script::Pages(vec![article_page("Rendered")]));
    let url = format!("{}/app", server.uri());
    let result = scraper.scrape(&ScrapeRequest::new(&url)).await.unwrap();

    assert_eq!(result.method_used, FetchMethod::Browser);
    assert_eq!(result.document.title, "Rendered");
    assert_eq!(launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_browser_retries_until_content_appears() {
    let server = MockServer::start().await;
    mount_page(&server, "/slow", 200, APP_SHELL).await;

    let pages = vec![
        APP_SHELL.to_string(),
        APP_SHELL.to_string(),
        article_page("Eventually"),
    ];
    let (scraper, _) = create_scraper(&server, Script::Pages(pages));
    let url = format!("{}/slow", server.uri());
    let result = scraper.scrape(&ScrapeRequest::new(&url)).await.unwrap();

    assert_eq!(result.method_used, FetchMethod::Browser);
    assert_eq!(result.document.title, "Eventually");
}

#[tokio::test]
async fn test_server_error_escalates_to_browser() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 503, "Service Unavailable").await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![article_page("Recovered")]));
    let result = scraper
        .scrape(&ScrapeRequest::new(server.uri()))
        .await
        .unwrap();

    assert_eq!(result.method_used, FetchMethod::Browser);
}

#[tokio::test]
async fn test_redirect_loop_escalates_to_browser() {
    let server = MockServer::start().await;
    for (from, to) in [("/loop/a", "/loop/b"), ("/loop/b", "/loop/a")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(ResponseTemplate::new(302).insert_header("location", to))
            .mount(&server)
            .await;
    }

    let (scraper, launches) = create_scraper(&server, Script::Pages(vec![article_page("Looped")]));
    let url = format!("{}/loop/a", server.uri());
    let result = scraper.scrape(&ScrapeRequest::new(&url)).await.unwrap();

    assert_eq!(result.method_used, FetchMethod::Browser);
    assert_eq!(launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forbidden_and_challenge_is_blocked() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 403, CHALLENGE_PAGE).await;

    let (scraper, launches) =
        create_scraper(&server, Script::Pages(vec![CHALLENGE_PAGE.to_string()]));
    let failure = scraper
        .scrape(&ScrapeRequest::new(server.uri()))
        .await
        .unwrap_err();

    assert_eq!(failure.error_type, ErrorType::Blocked);
    assert_eq!(failure.status(), 422);

    let details = failure.details.expect("details");
    assert_eq!(details.http_error, "HTTP_ERROR_403");
    assert_eq!(details.browser_error, "BLOCKED_OR_EMPTY");
    assert_eq!(launches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_wall_is_reported() {
    let server = MockServer::start().await;
    mount_page(&server, "/feed", 401, LOGIN_PAGE).await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![LOGIN_PAGE.to_string()]));
    let url = format!("{}/feed", server.uri());
    let failure = scraper.scrape(&ScrapeRequest::new(&url)).await.unwrap_err();

    assert_eq!(failure.error_type, ErrorType::LoginOrBlocked);
    assert_eq!(failure.status(), 422);
    assert!(failure.message.contains("official API"));
}

#[tokio::test]
async fn test_browser_deadline_is_timeout() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, APP_SHELL).await;

    let (scraper, _) = create_scraper(&server, Script::Stall);
    let failure = scraper
        .scrape(&ScrapeRequest::new(server.uri()))
        .await
        .unwrap_err();

    assert_eq!(failure.error_type, ErrorType::Timeout);
    assert_eq!(failure.status(), 422);
    let details = failure.details.expect("details");
    assert_eq!(details.http_error, "JAVASCRIPT_RENDERED");
    assert_eq!(details.browser_error, "BROWSER_TIMEOUT");
}

#[tokio::test]
async fn test_missing_browser_is_scrape_error_without_details() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, APP_SHELL).await;

    let (scraper, _) = create_scraper(
        &server,
        Script::LaunchFails(|| FetchError::BrowserExecutableNotFound),
    );
    let failure = scraper
        .scrape(&ScrapeRequest::new(server.uri()))
        .await
        .unwrap_err();

    assert_eq!(failure.error_type, ErrorType::ScrapeError);
    assert!(failure.details.is_none());
}

#[tokio::test]
async fn test_prompt_adds_summary() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Summarized")).await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .and(body_string_contains("List the key points"))
        .and(body_string_contains("Title: Summarized"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Two short points."))
        .expect(1)
        .mount(&server)
        .await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let request = ScrapeRequest::new(server.uri()).with_prompt("List the key points");
    let result = scraper.scrape(&request).await.unwrap();

    assert_eq!(result.summary.as_deref(), Some("Two short points."));
}

#[tokio::test]
async fn test_rate_limited_summary_falls_back() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Busy")).await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let request = ScrapeRequest::new(server.uri()).with_prompt("Summarize");
    let result = scraper.scrape(&request).await.unwrap();

    assert_eq!(result.method_used, FetchMethod::Http);
    assert_eq!(result.summary.as_deref(), Some(RATE_LIMITED_SUMMARY));
}

#[tokio::test]
async fn test_failed_summary_falls_back() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Broken")).await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let request = ScrapeRequest::new(server.uri()).with_prompt("Summarize");
    let result = scraper.scrape(&request).await.unwrap();

    assert_eq!(result.summary.as_deref(), Some(UNAVAILABLE_SUMMARY));
}

#[tokio::test]
async fn test_blank_prompt_skips_summary() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Quiet")).await;

    Mock::given(method("POST"))
        .and(path("/summarize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unused"))
        .expect(0)
        .mount(&server)
        .await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let request = ScrapeRequest::new(server.uri()).with_prompt("   ");
    let result = scraper.scrape(&request).await.unwrap();

    assert!(result.summary.is_none());
}

#[tokio::test]
async fn test_repeated_scrapes_extract_the_same_content() {
    let server = MockServer::start().await;
    mount_page(&server, "/", 200, &article_page("Stable")).await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let request = ScrapeRequest::new(server.uri());
    let first = scraper.scrape(&request).await.unwrap();
    let second = scraper.scrape(&request).await.unwrap();

    assert_eq!(first.document, second.document);
}

#[tokio::test]
async fn test_concurrent_scrapes_share_one_scraper() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", 200, &article_page("A")).await;
    mount_page(&server, "/b", 200, &article_page("B")).await;

    let (scraper, _) = create_scraper(&server, Script::Pages(vec![]));
    let a = ScrapeRequest::new(format!("{}/a", server.uri()));
    let b = ScrapeRequest::new(format!("{}/b", server.uri()));
    let (a, b) = tokio::join!(scraper.scrape(&a), scraper.scrape(&b));

    assert_eq!(a.unwrap().document.title, "A");
    assert_eq!(b.unwrap().document.title, "B");
}

/// Drives a real Chromium against a public page
#[tokio::test]
#[ignore = "needs network access and a local Chromium"]
async fn test_real_browser_scrape() {
    let scraper = Scraper::from_config(&Config::default(), RuntimeEnvironment::Local).unwrap();
    let result = scraper
        .scrape(&ScrapeRequest::new("https://example.com"))
        .await
        .unwrap();

    assert_eq!(result.method_used, FetchMethod::Http);
    assert!(!result.document.title.is_empty());
    assert!(result.document.title.contains("Example Domain"));
    assert!(result.summary.is_none());
}
