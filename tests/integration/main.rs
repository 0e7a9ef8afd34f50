//! Integration tests for PageLens
//!
//! Target pages and the summarization endpoint are served by wiremock; the
//! headless browser is replaced by a scripted launcher.

mod fetch_tests;
mod scrape_tests;
