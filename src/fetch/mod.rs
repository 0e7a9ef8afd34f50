//! Fetch strategies for PageLens
//!
//! This module holds the two ways a page is retrieved:
//! - [`HttpFetcher`]: one plain GET with browser-like headers
//! - [`RenderedFetcher`]: a headless browser with a bounded retry loop
//!
//! Both return an [`ExtractedDocument`](crate::extract::ExtractedDocument) or
//! a [`FetchError`]. The error's `Display` output is a stable code that ends
//! up in the public failure details.

pub mod browser;
mod http;

pub use browser::{
    resolve_executable, BrowserLauncher, BrowserSession, ChromeLauncher, RenderedFetcher,
    RequestFilter, ResourceKind, Verdict,
};
pub use http::{build_http_client, HttpFetcher};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Strategy that produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FetchMethod {
    Http,
    Browser,
}

/// Failure of a single fetch strategy
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a 4xx status
    #[error("HTTP_ERROR_{status}")]
    HttpStatus { status: u16 },

    /// The server answered with a 5xx status
    #[error("Request failed with status code {status}")]
    ServerError { status: u16 },

    /// The plain response looks like a bot wall or a script-only shell
    #[error("JAVASCRIPT_RENDERED")]
    JavascriptRendered,

    #[error("HTTP_TIMEOUT")]
    HttpTimeout,

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("BROWSER_TIMEOUT")]
    BrowserTimeout,

    /// Serverless runtime without a bundled Chromium
    #[error("BROWSER_EXECUTABLE_NOT_FOUND")]
    BrowserExecutableNotFound,

    /// Local runtime with no configured or discoverable browser
    #[error("LOCAL_BROWSER_EXECUTABLE_NOT_CONFIGURED")]
    LocalBrowserExecutableNotConfigured,

    /// Every rendered attempt still looked blocked or empty
    #[error("BLOCKED_OR_EMPTY")]
    BlockedOrEmpty,

    /// The last rendered attempt showed a sign-in wall
    #[error("LOGIN_OR_BLOCKED")]
    LoginOrBlocked,

    #[error("Browser error: {0}")]
    Browser(String),
}

impl FetchError {
    /// True for faults in how the browser is provisioned, which retrying
    /// cannot fix
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            FetchError::BrowserExecutableNotFound | FetchError::LocalBrowserExecutableNotConfigured
        )
    }
}
