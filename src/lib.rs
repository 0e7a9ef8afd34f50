//! PageLens: a single-page web scraper
//!
//! This crate fetches one web page, extracts structured content from it and
//! optionally asks an AI service for a summary. A plain HTTP fetch is tried
//! first; pages that look blocked or script-rendered escalate to a headless
//! browser.

pub mod classify;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod scrape;
pub mod summarize;
pub mod url;

use thiserror::Error;

/// Main error type for PageLens setup and I/O
///
/// Scrape outcomes are reported as [`ScrapeFailure`] records instead.
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] fetch::FetchError),

    #[error("Summarizer error: {0}")]
    Summary(#[from] summarize::SummaryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for PageLens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{extract_document, ExtractedDocument};
pub use fetch::{FetchError, FetchMethod};
pub use scrape::{ErrorType, ScrapeFailure, ScrapeRequest, ScrapeResult, Scraper};
pub use crate::url::validate_url;
