//! Scrape orchestration
//!
//! This module ties the pipeline together:
//! - Validates the requested URL
//! - Tries the lightweight fetcher under its deadline
//! - Escalates to the rendered fetcher under its own deadline
//! - Builds the result and, when a prompt was given, asks for a summary
//! - Maps failures of both strategies to the public error taxonomy
//!
//! A [`Scraper`] holds no per-request state and can serve any number of
//! concurrent calls.

mod error;
mod result;

pub use error::{classify_failure, ErrorType, FailureDetails, ScrapeFailure};
pub use result::{ScrapeRequest, ScrapeResult};

use crate::config::{BrowserSettings, Config, RuntimeEnvironment, SummarizerSettings};
use crate::extract::ExtractedDocument;
use crate::fetch::{
    BrowserLauncher, ChromeLauncher, FetchError, FetchMethod, HttpFetcher, RenderedFetcher,
    RequestFilter,
};
use crate::summarize::{build_digest, summarize_with_fallback, HttpSummarizer, Summarizer};
use crate::url::validate_url;
use crate::LensError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Runs scrape requests end to end
#[derive(Clone)]
pub struct Scraper {
    http: HttpFetcher,
    http_deadline: Duration,
    rendered: RenderedFetcher,
    summarizer: Arc<dyn Summarizer>,
    summary_settings: SummarizerSettings,
}

impl Scraper {
    /// Creates a scraper with explicit browser and summarizer collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Validated configuration
    /// * `launcher` - Starts one browser per rendered fetch
    /// * `summarizer` - Produces the optional summary
    pub fn new(
        config: &Config,
        launcher: Arc<dyn BrowserLauncher>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self, LensError> {
        Ok(Self {
            http: HttpFetcher::new(&config.http)?,
            http_deadline: config.http.deadline(),
            rendered: RenderedFetcher::new(config.browser.clone(), launcher),
            summarizer,
            summary_settings: config.summarizer.clone(),
        })
    }

    /// Creates a scraper that drives a local or bundled Chromium and calls
    /// the configured summarization endpoint
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pagelens::config::{Config, RuntimeEnvironment};
    /// use pagelens::scrape::{ScrapeRequest, Scraper};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let scraper = Scraper::from_config(&Config::default(), RuntimeEnvironment::Local)?;
    /// let result = scraper.scrape(&ScrapeRequest::new("https://example.com")).await?;
    /// println!("{}", result.document.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config, runtime: RuntimeEnvironment) -> Result<Self, LensError> {
        let launcher =
            ChromeLauncher::new(config.browser.clone(), runtime, RequestFilter::default())
                .with_user_agent(config.http.user_agent.as_str());
        let summarizer = HttpSummarizer::new(&config.summarizer)?;
        Self::new(config, Arc::new(launcher), Arc::new(summarizer))
    }

    pub fn browser_settings(&self) -> &BrowserSettings {
        self.rendered.settings()
    }

    /// Scrapes one page
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeResult)` - Extraction from whichever strategy succeeded
    /// * `Err(ScrapeFailure)` - Invalid input, or both strategies failed
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScrapeFailure> {
        let url = match validate_url(&request.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Rejected input URL '{}': {}", request.url, e);
                return Err(ScrapeFailure::invalid_input(&e, &request.url));
            }
        };

        let http_error = match self.fetch_lightweight(&url).await {
            Ok(document) => {
                return Ok(self.assemble(&url, FetchMethod::Http, document, request).await);
            }
            Err(e) => e,
        };

        tracing::info!("Escalating {} to the browser after: {}", url, http_error);

        let browser_error = match self.fetch_rendered(&url).await {
            Ok(document) => {
                return Ok(self.assemble(&url, FetchMethod::Browser, document, request).await);
            }
            Err(e) => e,
        };

        Err(classify_failure(url.as_str(), &http_error, &browser_error))
    }

    async fn fetch_lightweight(&self, url: &Url) -> Result<ExtractedDocument, FetchError> {
        match tokio::time::timeout(self.http_deadline, self.http.fetch(url)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::HttpTimeout),
        }
    }

    async fn fetch_rendered(&self, url: &Url) -> Result<ExtractedDocument, FetchError> {
        let deadline = self.rendered.settings().deadline();
        match tokio::time::timeout(deadline, self.rendered.fetch(url)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!("Rendered fetch of {} exceeded {:?}", url, deadline);
                Err(FetchError::BrowserTimeout)
            }
        }
    }

    async fn assemble(
        &self,
        url: &Url,
        method: FetchMethod,
        document: ExtractedDocument,
        request: &ScrapeRequest,
    ) -> ScrapeResult {
        tracing::info!("Scraped {} via {:?}", url, method);

        let summary = match request.prompt() {
            Some(prompt) => {
                let limit = self.summary_settings.digest_limit;
                let digest = build_digest(&document, url.as_str(), limit);
                Some(
                    summarize_with_fallback(
                        self.summarizer.as_ref(),
                        prompt,
                        &digest,
                        self.summary_settings.timeout(),
                    )
                    .await,
                )
            }
            None => None,
        };

        ScrapeResult {
            url: url.to_string(),
            method_used: method,
            summary,
            document,
            scraped_at: Utc::now(),
        }
    }
}
