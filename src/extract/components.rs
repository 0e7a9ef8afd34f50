use crate::extract::dom::{self, Dom};
use crate::extract::text::truncate_chars;
use crate::extract::Component;
use std::collections::HashSet;

/// Maximum number of components kept per document
pub const MAX_COMPONENTS: usize = 80;

/// Maximum length of a component's content, in characters
pub const MAX_CONTENT_CHARS: usize = 300;

/// Headings, quotes, code, form controls, landmarks, embeds, and anything
/// carrying an explicit ARIA role
const COMPONENT_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, blockquote, pre, code, \
    form, button, input, select, textarea, label, \
    header, nav, main, aside, footer, section, article, dialog, details, summary, \
    iframe, embed, object, [role]";

/// Tags covered by other extractors (paragraphs, links, media, tables, lists)
const EXCLUDED_TAGS: &[&str] = &[
    "p", "a", "img", "picture", "source", "video", "audio", "svg", "canvas", "table", "thead",
    "tbody", "tfoot", "tr", "td", "th", "caption", "ul", "ol", "li",
];

/// Attributes used as content when an element has no text of its own
const LABEL_ATTRIBUTES: &[&str] = &["aria-label", "placeholder", "title"];

/// Attributes listed in the compact summary suffix
const SUMMARY_ATTRIBUTES: &[&str] = &[
    "type",
    "name",
    "id",
    "placeholder",
    "value",
    "aria-label",
    "role",
    "title",
];

/// Extracts notable non-paragraph elements, deduplicated by (name, content)
///
/// `content` is the element text, or else the first non-empty of
/// `aria-label`/`placeholder`/`title`, followed by a bracketed attribute
/// summary when the element carries any of the summary attributes. The whole
/// string is capped at [`MAX_CONTENT_CHARS`]. Elements that end up with no
/// content at all are skipped.
pub fn extract_components(dom: &Dom) -> Vec<Component> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut components = Vec::new();

    for element in dom.query(COMPONENT_SELECTOR) {
        if components.len() >= MAX_COMPONENTS {
            break;
        }

        let name = dom::tag(element);
        if EXCLUDED_TAGS.contains(&name) {
            continue;
        }

        let own_text = dom::text(element);
        let base = if own_text.is_empty() {
            LABEL_ATTRIBUTES
                .iter()
                .find_map(|attribute| dom::attr_text(element, attribute))
                .unwrap_or_default()
        } else {
            own_text
        };

        let summary = attribute_summary(element);
        let content = match (base.is_empty(), summary.is_empty()) {
            (true, true) => continue,
            (false, true) => base,
            (true, false) => format!("[{}]", summary),
            (false, false) => format!("{} [{}]", base, summary),
        };
        let content = truncate_chars(&content, MAX_CONTENT_CHARS);

        let key = (name.to_string(), content);
        if seen.contains(&key) {
            continue;
        }
        seen.insert(key.clone());

        components.push(Component {
            name: key.0,
            content: key.1,
        });
    }

    components
}

/// `type=email name=q` style summary of the interesting attributes
fn attribute_summary(element: scraper::ElementRef<'_>) -> String {
    SUMMARY_ATTRIBUTES
        .iter()
        .filter_map(|attribute| {
            dom::attr_text(element, attribute).map(|value| format!("{}={}", attribute, value))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
