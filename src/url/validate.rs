use crate::UrlError;
use url::Url;

/// Schemes the scraper is willing to fetch
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Validates a raw user-supplied URL and returns its canonical form
///
/// No network access happens here. A failure is terminal for the request and
/// is reported to the caller as a client input fault.
///
/// # Arguments
///
/// * `raw` - The URL string exactly as supplied by the caller
///
/// # Returns
///
/// * `Ok(Url)` - Absolute http(s) URL; `as_str()` is the canonical href
/// * `Err(UrlError::InvalidUrl)` - The string is not an absolute URL
/// * `Err(UrlError::InvalidScheme)` - The scheme is not http or https
///
/// # Examples
///
/// ```
/// use pagelens::url::validate_url;
///
/// let url = validate_url("https://Example.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
///
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    Ok(url)
}
