use url::Url;

/// Resolves an href/src value found in a document against the page URL
///
/// Resolution failures are not errors: the entry is simply dropped, unless the
/// raw value already looks absolute, in which case it is kept verbatim.
///
/// # Arguments
///
/// * `raw` - The attribute value as written in the markup
/// * `base_url` - The URL the document was fetched from
///
/// # Returns
///
/// * `Some(String)` - Absolute URL
/// * `None` - Empty value, or an unresolvable relative value
///
/// # Examples
///
/// ```
/// use pagelens::url::resolve_against;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post").unwrap();
/// assert_eq!(
///     resolve_against("../img/a.png", &base),
///     Some("https://example.com/img/a.png".to_string())
/// );
/// ```
pub fn resolve_against(raw: &str, base_url: &Url) -> Option<String> {
    let raw = raw.trim();

    if raw.is_empty() {
        return None;
    }

    match base_url.join(raw) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(_) if looks_absolute(raw) => Some(raw.to_string()),
        Err(_) => None,
    }
}

/// Returns true if the value carries its own scheme or is protocol-relative
fn looks_absolute(raw: &str) -> bool {
    let lower = raw.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}
