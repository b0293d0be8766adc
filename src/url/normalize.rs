use crate::UrlError;
use url::Url;

/// Schemes the crawler is willing to fetch
const CRAWLABLE_SCHEMES: &[&str] = &["http", "https"];

/// Returns true if the scheme is one the crawler fetches
pub fn is_crawlable_scheme(scheme: &str) -> bool {
    CRAWLABLE_SCHEMES.contains(&scheme)
}

/// Normalizes a URL string into its canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject any scheme other than `http` and `https`
/// 3. Reject URLs without a host
/// 4. Remove the fragment
///
/// Lowercasing the scheme and host, resolving dot segments and turning an
/// empty path into `/` are done by the parser itself.
///
/// # Examples
///
/// ```
/// use skein::url::normalize_url;
///
/// let url = normalize_url("HTTP://Example.TEST/a/../b#top").unwrap();
/// assert_eq!(url.as_str(), "http://example.test/b");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let url = Url::parse(trimmed)?;
    normalize_parsed(url)
}

/// Applies normalization to an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if !is_crawlable_scheme(url.scheme()) {
        return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    Ok(url)
}
