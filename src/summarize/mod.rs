//! Optional AI summary of a scraped page
//!
//! The summary is best-effort: any failure of the collaborator turns into a
//! fixed fallback sentence instead of failing the scrape.

mod client;
mod digest;

pub use client::HttpSummarizer;
pub use digest::build_digest;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Summary text used when the collaborator answers 429
pub const RATE_LIMITED_SUMMARY: &str =
    "Summary unavailable: the AI service is rate limited right now. Please try again in a minute.";

/// Summary text used for every other collaborator failure
pub const UNAVAILABLE_SUMMARY: &str = "Summary unavailable: the AI service could not be reached.";

/// Summarization collaborator failure
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summarization service is rate limited")]
    RateLimited,

    #[error("Summarization service unavailable: {0}")]
    Unavailable(String),
}

impl SummaryError {
    /// The user-facing sentence that replaces the summary
    pub fn fallback(&self) -> &'static str {
        match self {
            SummaryError::RateLimited => RATE_LIMITED_SUMMARY,
            SummaryError::Unavailable(_) => UNAVAILABLE_SUMMARY,
        }
    }
}

/// Turns text into a summary
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError>;
}

/// Combines the user prompt and the digest into the message sent upstream
pub fn compose_prompt(prompt: &str, digest: &str) -> String {
    format!("{}:\n\n{}", prompt, digest)
}

/// Asks `summarizer` for a summary, never failing
///
/// A timeout counts as unavailability.
pub async fn summarize_with_fallback(
    summarizer: &dyn Summarizer,
    prompt: &str,
    digest: &str,
    timeout: Duration,
) -> String {
    let content = compose_prompt(prompt, digest);

    let outcome = match tokio::time::timeout(timeout, summarizer.summarize(&content)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(SummaryError::Unavailable(format!(
            "no answer within {:?}",
            timeout
        ))),
    };

    match outcome {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("Falling back to placeholder summary: {}", e);
            e.fallback().to_string()
        }
    }
}
