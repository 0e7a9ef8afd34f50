use crate::fetch::FetchError;
use crate::UrlError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Public failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorType {
    InvalidUrl,
    InvalidUrlProtocol,
    Timeout,
    Blocked,
    LoginOrBlocked,
    ScrapeError,
    InternalError,
}

impl ErrorType {
    /// HTTP-equivalent status reported with the failure
    pub fn status(self) -> u16 {
        match self {
            ErrorType::InvalidUrl | ErrorType::InvalidUrlProtocol => 400,
            ErrorType::InternalError => 500,
            ErrorType::Timeout
            | ErrorType::Blocked
            | ErrorType::LoginOrBlocked
            | ErrorType::ScrapeError => 422,
        }
    }

    /// Short headline for the `error` field
    pub fn title(self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => "Invalid URL",
            ErrorType::InvalidUrlProtocol => "Invalid URL protocol",
            ErrorType::Timeout => "Scrape timed out",
            ErrorType::Blocked => "Content blocked",
            ErrorType::LoginOrBlocked => "Login required",
            ErrorType::ScrapeError => "Scrape failed",
            ErrorType::InternalError => "Internal error",
        }
    }

    /// User-facing explanation for the `message` field
    pub fn message(self) -> &'static str {
        match self {
            ErrorType::InvalidUrl => {
                "The provided URL is not valid. Use a full address such as https://example.com."
            }
            ErrorType::InvalidUrlProtocol => "Only http and https URLs can be scraped.",
            ErrorType::Timeout => "The page took too long to load. Please try again later.",
            ErrorType::Blocked => {
                "The website blocked automated access or did not return any readable content."
            }
            ErrorType::LoginOrBlocked => {
                "This page requires signing in or blocks automated access. \
                 Consider using the site's official API instead."
            }
            ErrorType::ScrapeError => "The page could not be scraped.",
            ErrorType::InternalError => "An unexpected error occurred.",
        }
    }
}

/// Diagnostic codes of both fetch strategies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureDetails {
    pub http_error: String,
    pub browser_error: String,
}

/// Failure record returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{error}: {message}")]
pub struct ScrapeFailure {
    pub error: String,
    pub error_type: ErrorType,
    pub message: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FailureDetails>,
    pub timestamp: DateTime<Utc>,
}

impl ScrapeFailure {
    pub fn new(error_type: ErrorType, url: &str, details: Option<FailureDetails>) -> Self {
        Self {
            error: error_type.title().to_string(),
            error_type,
            message: error_type.message().to_string(),
            url: url.to_string(),
            details,
            timestamp: Utc::now(),
        }
    }

    /// Failure for input the validator rejected
    pub fn invalid_input(error: &UrlError, raw_url: &str) -> Self {
        let error_type = match error {
            UrlError::InvalidUrl(_) => ErrorType::InvalidUrl,
            UrlError::InvalidScheme(_) => ErrorType::InvalidUrlProtocol,
        };
        Self::new(error_type, raw_url, None)
    }

    /// Failure for anything outside the scrape pipeline; carries no detail
    pub fn internal(url: &str) -> Self {
        Self::new(ErrorType::InternalError, url, None)
    }

    pub fn status(&self) -> u16 {
        self.error_type.status()
    }
}

/// Maps the errors of both strategies to one public failure
///
/// The rendered fetcher's error decides the classification; the lightweight
/// error only tips a generic browser failure into `TIMEOUT` when the plain
/// fetch timed out as well. Configuration faults are logged and reported as
/// `SCRAPE_ERROR` without details.
pub fn classify_failure(
    url: &str,
    http_error: &FetchError,
    browser_error: &FetchError,
) -> ScrapeFailure {
    if browser_error.is_configuration() {
        tracing::error!("Browser is not available: {}", browser_error);
        return ScrapeFailure::new(ErrorType::ScrapeError, url, None);
    }

    let error_type = match browser_error {
        FetchError::BrowserTimeout => ErrorType::Timeout,
        FetchError::LoginOrBlocked => ErrorType::LoginOrBlocked,
        FetchError::BlockedOrEmpty => ErrorType::Blocked,
        FetchError::Browser(_) if matches!(http_error, FetchError::HttpTimeout) => {
            ErrorType::Timeout
        }
        _ => ErrorType::ScrapeError,
    };

    tracing::warn!(
        "Scrape of {} failed as {:?} (http: {}, browser: {})",
        url,
        error_type,
        http_error,
        browser_error
    );

    ScrapeFailure::new(
        error_type,
        url,
        Some(FailureDetails {
            http_error: http_error.to_string(),
            browser_error: browser_error.to_string(),
        }),
    )
}
