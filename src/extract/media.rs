use crate::extract::dom::{self, Dom};
use crate::extract::Link;
use crate::url::resolve_against;
use url::Url;

/// Maximum number of image URLs kept per document
pub const MAX_IMAGES: usize = 20;

/// Maximum number of links kept per document
pub const MAX_LINKS: usize = 50;

/// Extracts absolute image URLs from `<img src>` (or `data-src` when `src`
/// is missing), in document order. Duplicates are kept.
pub fn extract_images(dom: &Dom, base_url: &Url) -> Vec<String> {
    dom.query("img")
        .into_iter()
        .filter_map(|img| {
            let raw = dom::attr_text(img, "src").or_else(|| dom::attr_text(img, "data-src"))?;
            resolve_against(&raw, base_url)
        })
        .take(MAX_IMAGES)
        .collect()
}

/// Extracts `<a href>` links as absolute URLs with their anchor text
///
/// # Exclusions
///
/// - Fragment-only hrefs (`#top`)
/// - `javascript:` hrefs
/// - Hrefs that cannot be resolved against the page URL
pub fn extract_links(dom: &Dom, base_url: &Url) -> Vec<Link> {
    dom.query("a[href]")
        .into_iter()
        .filter_map(|anchor| {
            let href = dom::attr(anchor, "href")?.trim();

            if href.starts_with('#') || is_script_href(href) {
                return None;
            }

            let url = resolve_against(href, base_url)?;
            Some(Link {
                url,
                text: dom::text(anchor),
            })
        })
        .take(MAX_LINKS)
        .collect()
}

fn is_script_href(href: &str) -> bool {
    href.get(..11)
        .map(|prefix| prefix.eq_ignore_ascii_case("javascript:"))
        .unwrap_or(false)
}
