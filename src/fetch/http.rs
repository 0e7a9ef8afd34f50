//! Lightweight HTTP fetcher
//!
//! Issues one GET with a desktop-browser header set, extracts the body and
//! rejects responses the classifier considers blocked or script-only. It
//! never retries; the orchestrator escalates instead.

use crate::classify::looks_blocked_or_js_required;
use crate::config::HttpSettings;
use crate::extract::{extract_document, ExtractedDocument};
use crate::fetch::FetchError;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect::Policy, Client};
use url::Url;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Builds an HTTP client that looks like a desktop browser
///
/// `Accept-Encoding` is negotiated by the client itself from its enabled
/// decoders (gzip, brotli, deflate) so bodies are transparently decompressed.
///
/// # Arguments
///
/// * `settings` - The lightweight fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. an invalid user agent)
///
/// # Example
///
/// ```no_run
/// use pagelens::config::HttpSettings;
/// use pagelens::fetch::build_http_client;
///
/// let client = build_http_client(&HttpSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .timeout(settings.timeout())
        .redirect(Policy::limited(settings.max_redirects))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// Plain GET fetch strategy
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    accept_language: String,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(settings: &HttpSettings) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_http_client(settings)?,
            accept_language: settings.accept_language.clone(),
        })
    }

    /// Fetches `url` and extracts it
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Status 400-499 | `HttpStatus` |
    /// | Status 500+ | `ServerError` |
    /// | Network timeout | `HttpTimeout` |
    /// | Other transport failure | `Transport` |
    /// | Body looks blocked or script-only | `JavascriptRendered` |
    pub async fn fetch(&self, url: &Url) -> Result<ExtractedDocument, FetchError> {
        tracing::info!("Lightweight fetch: {}", url);

        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT_LANGUAGE, self.accept_language.as_str())
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        tracing::debug!("Lightweight fetch status {} for {}", status, url);

        if status.is_server_error() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
            });
        }

        if status.is_client_error() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(classify_transport)?;
        let document = extract_document(&body, &final_url);

        if looks_blocked_or_js_required(&body, &document) {
            tracing::info!(
                "Lightweight fetch of {} looks script-rendered or blocked ({} chars of text)",
                url,
                document.body_text_length
            );
            return Err(FetchError::JavascriptRendered);
        }

        Ok(document)
    }
}

fn classify_transport(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::HttpTimeout
    } else {
        FetchError::Transport(error)
    }
}
