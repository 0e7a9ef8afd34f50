use crate::fetch::FetchError;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Starts browser sessions
///
/// Every call must return a fresh, exclusively owned browser; sessions are
/// never pooled or shared between requests.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, FetchError>;
}

/// One headless browser with a single page
///
/// Dropping a session without calling [`close`](BrowserSession::close) must
/// still release the browser process.
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigates and waits until the DOM content is loaded
    async fn navigate(&mut self, url: &Url, timeout: Duration) -> Result<(), FetchError>;

    /// Waits until the body text reaches `min_chars` characters
    ///
    /// Returns `false` if `timeout` elapsed first. Never fails.
    async fn wait_for_text(&mut self, min_chars: usize, timeout: Duration) -> bool;

    /// Waits until no request has been in flight for `idle_window`
    ///
    /// Returns `false` if `timeout` elapsed first. Never fails.
    async fn wait_for_network_idle(&mut self, idle_window: Duration, timeout: Duration) -> bool;

    /// Serializes the current DOM
    async fn content(&mut self) -> Result<String, FetchError>;

    /// Scrolls to the bottom of the document to trigger lazy loading
    async fn scroll_to_bottom(&mut self) -> Result<(), FetchError>;

    /// Shuts the browser down and waits for the process to exit
    async fn close(self: Box<Self>);
}
