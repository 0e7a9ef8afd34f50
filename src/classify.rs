//! Heuristics that decide whether a fetched document is trustworthy
//!
//! These predicates are tuned against common bot walls and single-page-app
//! shells. They escalate some legitimately short pages and accept some
//! subtly broken renders; callers treat them as a reasonable-effort signal.

use crate::extract::dom::Dom;
use crate::extract::ExtractedDocument;

/// Visible body text below this length suggests a blocked or script-only page
pub const MIN_BODY_TEXT_CHARS: usize = 120;

/// Body text length under which a document with few paragraphs counts as empty
pub const EMPTY_BODY_TEXT_CHARS: usize = 200;

/// Phrases (lowercase) served by challenge pages and bot walls
pub const CHALLENGE_PHRASES: &[&str] = &[
    "enable javascript",
    "javascript is required",
    "javascript is disabled",
    "please enable cookies",
    "cf-browser-verification",
    "cf-challenge",
    "challenge-platform",
    "checking your browser",
    "verify you are human",
    "access denied",
    "attention required! | cloudflare",
];

/// Phrases (lowercase) that mark a sign-in wall
pub const LOGIN_PHRASES: &[&str] = &[
    "sign in to continue",
    "log in to continue",
    "login to continue",
    "login required",
    "you must be logged in",
    "please log in",
    "please sign in",
];

/// True if the raw document looks like a bot wall or a page that needs
/// JavaScript to show anything
///
/// Fires when the visible body text is shorter than [`MIN_BODY_TEXT_CHARS`]
/// or the raw HTML contains any of [`CHALLENGE_PHRASES`].
pub fn looks_blocked_or_js_required(html: &str, doc: &ExtractedDocument) -> bool {
    if doc.body_text_length < MIN_BODY_TEXT_CHARS {
        return true;
    }

    contains_any(&html.to_lowercase(), CHALLENGE_PHRASES)
}

/// True if the extraction produced too little to be worth returning
///
/// Either the body text is short and there are fewer than two paragraphs, or
/// there are no paragraphs and at most three links.
pub fn looks_empty_extraction(doc: &ExtractedDocument) -> bool {
    let thin_text = doc.body_text_length < EMPTY_BODY_TEXT_CHARS && doc.paragraphs.len() < 2;
    let no_structure = doc.paragraphs.is_empty() && doc.links.len() <= 3;
    thin_text || no_structure
}

/// True if the document looks like a sign-in wall rather than content
///
/// Used only to refine why a rendered fetch gave up.
pub fn looks_login_walled(html: &str) -> bool {
    let dom = Dom::parse(html);
    if dom.first("input[type='password']").is_some() {
        return true;
    }

    contains_any(&dom.body_text().to_lowercase(), LOGIN_PHRASES)
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
