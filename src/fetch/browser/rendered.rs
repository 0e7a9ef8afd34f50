//! Rendered fetch strategy
//!
//! Drives one browser session through navigation, a best-effort text wait
//! and a bounded capture loop. Each attempt waits for network idle, captures
//! the DOM and runs both classifier predicates; a rejected attempt scrolls
//! down and backs off before the next one.

use crate::classify::{looks_blocked_or_js_required, looks_empty_extraction, looks_login_walled};
use crate::config::BrowserSettings;
use crate::extract::{extract_document, ExtractedDocument};
use crate::fetch::browser::{BrowserLauncher, BrowserSession};
use crate::fetch::FetchError;
use std::sync::Arc;
use url::Url;

/// Headless browser fetch strategy
#[derive(Clone)]
pub struct RenderedFetcher {
    launcher: Arc<dyn BrowserLauncher>,
    settings: BrowserSettings,
}

impl RenderedFetcher {
    pub fn new(settings: BrowserSettings, launcher: Arc<dyn BrowserLauncher>) -> Self {
        Self { launcher, settings }
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    /// Renders `url` and extracts the first acceptable capture
    ///
    /// The session is closed before returning on every path. If the future
    /// is dropped mid-flight, dropping the session releases the browser.
    ///
    /// # Errors
    ///
    /// * Launch failures, including unresolvable executables
    /// * Navigation failures and `BrowserTimeout` for a missed DOM gate
    /// * `LoginOrBlocked` or `BlockedOrEmpty` when every attempt is rejected
    pub async fn fetch(&self, url: &Url) -> Result<ExtractedDocument, FetchError> {
        tracing::debug!("Launching browser for {}", url);
        let mut session = self.launcher.launch().await?;

        let outcome = self.drive(session.as_mut(), url).await;

        session.close().await;
        tracing::debug!("Browser closed for {}", url);

        outcome
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        url: &Url,
    ) -> Result<ExtractedDocument, FetchError> {
        let settings = &self.settings;

        session.navigate(url, settings.navigation_timeout()).await?;

        if !session
            .wait_for_text(settings.min_text_chars, settings.text_wait())
            .await
        {
            tracing::debug!("Body text stayed short for {}; continuing", url);
        }

        let mut last_html = String::new();

        for attempt in 0..settings.max_attempts {
            if !session
                .wait_for_network_idle(settings.idle_window(), settings.idle_timeout())
                .await
            {
                tracing::trace!("Network never went idle on attempt {}", attempt + 1);
            }

            let html = session.content().await?;
            let document = extract_document(&html, url);
            let blocked = looks_blocked_or_js_required(&html, &document);
            let empty = looks_empty_extraction(&document);

            tracing::debug!(
                "Rendered attempt {}/{} for {}: blocked={} empty={} text={} paragraphs={}",
                attempt + 1,
                settings.max_attempts,
                url,
                blocked,
                empty,
                document.body_text_length,
                document.paragraphs.len()
            );

            if !blocked && !empty {
                return Ok(document);
            }

            last_html = html;

            if attempt + 1 < settings.max_attempts {
                if let Err(e) = session.scroll_to_bottom().await {
                    tracing::debug!("Scroll failed on attempt {}: {}", attempt + 1, e);
                }
                tokio::time::sleep(settings.attempt_delay(attempt)).await;
            }
        }

        if looks_login_walled(&last_html) {
            Err(FetchError::LoginOrBlocked)
        } else {
            Err(FetchError::BlockedOrEmpty)
        }
    }
}
