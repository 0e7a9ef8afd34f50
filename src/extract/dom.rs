//! Thin query capability over a parsed HTML document
//!
//! The extractor only ever needs four things from a document: select elements
//! by CSS selector, read an attribute, read normalized text, and walk a few
//! structural relations. Keeping those behind this module leaves `scraper` as
//! an implementation detail of one file.

use crate::extract::text::normalize_whitespace;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text never counts as visible body text
const INVISIBLE_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A parsed HTML document
pub struct Dom {
    document: Html,
}

impl Dom {
    /// Parses a full HTML document. Never fails: malformed markup is repaired
    /// by the HTML5 tree builder the same way a browser would.
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Returns all elements matching `css`, in document order
    ///
    /// An unparsable selector yields no elements.
    pub fn query(&self, css: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(css) {
            Ok(selector) => self.document.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Returns the first element matching `css`
    pub fn first(&self, css: &str) -> Option<ElementRef<'_>> {
        let selector = Selector::parse(css).ok()?;
        self.document.select(&selector).next()
    }

    /// Returns the first matching element whose normalized text is non-empty
    pub fn first_text(&self, css: &str) -> Option<String> {
        self.query(css)
            .into_iter()
            .map(text)
            .find(|t| !t.is_empty())
    }

    /// Text of the first non-empty document `<title>`
    ///
    /// `<title>` elements inside inline SVG are icon tooltips and are skipped.
    pub fn document_title(&self) -> Option<String> {
        self.query("title")
            .into_iter()
            .filter(|element| closest(*element, "svg").is_none())
            .map(text)
            .find(|t| !t.is_empty())
    }

    /// Returns the first non-empty `content` attribute among matching elements
    pub fn first_content_attr(&self, css: &str) -> Option<String> {
        self.query(css)
            .into_iter()
            .filter_map(|el| attr(el, "content"))
            .map(normalize_whitespace)
            .find(|c| !c.is_empty())
    }

    /// Normalized visible text of `<body>`
    pub fn body_text(&self) -> String {
        self.first("body").map(visible_text).unwrap_or_default()
    }
}

/// Returns descendants of `element` matching `css`, in document order
pub fn query_within<'a>(element: ElementRef<'a>, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => element.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Reads an attribute value
pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}

/// Reads an attribute value, whitespace-normalized, ignoring empty values
pub fn attr_text(element: ElementRef<'_>, name: &str) -> Option<String> {
    attr(element, name)
        .map(normalize_whitespace)
        .filter(|v| !v.is_empty())
}

/// Whitespace-normalized text content of an element and its descendants
pub fn text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Lowercase tag name of an element
pub fn tag(element: ElementRef<'_>) -> &str {
    element.value().name()
}

/// Direct element children of `element` whose tag is one of `names`
pub fn children_named<'a>(element: ElementRef<'a>, names: &[&str]) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| names.contains(&tag(*child)))
        .collect()
}

/// Nearest ancestor element with the given tag name
pub fn closest<'a>(element: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tag(*ancestor) == name)
}

/// Text of `element` with script/style/noscript/template subtrees left out
fn visible_text(element: ElementRef<'_>) -> String {
    let root_id = element.id();
    let mut raw = String::new();

    for node in element.descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .take_while(|ancestor| ancestor.id() != root_id)
            .filter_map(ElementRef::wrap)
            .any(|ancestor| INVISIBLE_TEXT_ELEMENTS.contains(&tag(ancestor)));

        if !hidden {
            raw.push_str(fragment);
        }
    }

    normalize_whitespace(&raw)
}
