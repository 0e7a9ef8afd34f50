//! HTML extraction module for PageLens
//!
//! This module turns one raw HTML document into a bounded, structured record:
//! - Title and description with fallback chains
//! - Paragraphs, images, links
//! - Tables, lists, and other notable components
//! - Technology signals
//!
//! Extraction is pure and deterministic: the same `(html, base_url)` always
//! produces the same record, and every collection is capped so adversarial
//! or malformed input cannot grow the output without bound.

mod components;
pub mod dom;
mod lists;
mod media;
mod tables;
pub mod tech;
pub mod text;

pub use components::{extract_components, MAX_COMPONENTS, MAX_CONTENT_CHARS};
pub use lists::{extract_lists, MAX_ITEMS, MAX_LISTS};
pub use media::{extract_images, extract_links, MAX_IMAGES, MAX_LINKS};
pub use tables::{extract_tables, MAX_COLUMNS, MAX_ROWS, MAX_TABLES};
pub use tech::detect_tech_stack;

use crate::url::host_of;
use dom::Dom;
use serde::{Deserialize, Serialize};
use text::{char_len, truncate_chars};
use url::Url;

/// Title used when the document has neither a `<title>` nor a heading
pub const UNTITLED: &str = "Untitled";

/// Minimum paragraph length, in characters, after whitespace normalization
pub const MIN_PARAGRAPH_CHARS: usize = 30;

/// Length of the description derived from the first paragraph
pub const DESCRIPTION_FALLBACK_CHARS: usize = 160;

/// Structured content of one HTML document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub title: String,
    pub description: String,
    pub paragraphs: Vec<String>,
    pub images: Vec<String>,
    pub links: Vec<Link>,
    pub tables: Vec<Table>,
    pub lists: Vec<List>,
    pub unique_components: Vec<Component>,
    pub tech_stack: Vec<TechSignal>,

    /// Visible body text length; only the classifier reads it
    #[serde(skip)]
    pub body_text_length: usize,
}

/// A hyperlink found in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub text: String,
}

/// A data table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    pub col_count: usize,
}

/// Ordered or unordered list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// A `<ul>`/`<ol>` list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    #[serde(rename = "type")]
    pub kind: ListKind,
    pub items: Vec<String>,
    pub item_count: usize,
}

/// A notable element that is not a paragraph, link, media, table or list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub content: String,
}

/// A detected technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechSignal {
    pub name: String,
    pub icon: String,
}

/// Extracts the structured record from an HTML document
///
/// # Arguments
///
/// * `html` - Raw HTML, possibly malformed
/// * `base_url` - URL the document came from; relative URLs resolve against it
///
/// # Example
///
/// ```
/// use pagelens::extract::extract_document;
/// use url::Url;
///
/// let html = r#"<html><head><title>Demo</title></head>
///     <body><p>This paragraph is comfortably longer than thirty characters.</p></body></html>"#;
/// let base = Url::parse("https://example.com/").unwrap();
/// let doc = extract_document(html, &base);
/// assert_eq!(doc.title, "Demo");
/// assert_eq!(doc.paragraphs.len(), 1);
/// ```
pub fn extract_document(html: &str, base_url: &Url) -> ExtractedDocument {
    let dom = Dom::parse(html);

    let paragraphs: Vec<String> = dom
        .query("p")
        .into_iter()
        .map(dom::text)
        .filter(|p| char_len(p) >= MIN_PARAGRAPH_CHARS)
        .collect();

    let title = dom
        .document_title()
        .or_else(|| dom.first_text("h1"))
        .or_else(|| dom.first_text("h2, h3, h4, h5, h6"))
        .unwrap_or_else(|| UNTITLED.to_string());

    let description = dom
        .first_content_attr("meta[name='description']")
        .or_else(|| dom.first_content_attr("meta[property='og:description']"))
        .or_else(|| {
            paragraphs
                .first()
                .map(|p| truncate_chars(p, DESCRIPTION_FALLBACK_CHARS))
        })
        .unwrap_or_default();

    let body_text_length = char_len(&dom.body_text());

    ExtractedDocument {
        title,
        description,
        images: extract_images(&dom, base_url),
        links: extract_links(&dom, base_url),
        tables: extract_tables(&dom),
        lists: extract_lists(&dom),
        unique_components: extract_components(&dom),
        tech_stack: detect_tech_stack(html, &host_of(base_url)),
        paragraphs,
        body_text_length,
    }
}
