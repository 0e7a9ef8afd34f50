//! URL handling module for PageLens
//!
//! This module provides input validation for the requested page URL and
//! resolution of relative references found inside fetched documents.

mod resolve;
mod validate;

// Re-export main functions
pub use resolve::resolve_against;
pub use validate::validate_url;

use url::Url;

/// Returns the lowercase host of a URL, or an empty string if it has none
///
/// Used by tech-stack detection, which matches signatures against the host.
pub fn host_of(url: &Url) -> String {
    url.host_str().map(|h| h.to_lowercase()).unwrap_or_default()
}
