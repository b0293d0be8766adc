use crate::url::normalize_parsed;
use crate::UrlError;
use url::Url;

/// Resolves an href found on `page` into a canonical absolute URL
///
/// Relative references are joined against the page the href was found on,
/// never against the seed. The result must be an `http` or `https` URL.
///
/// Returns an error if the link should be discarded:
/// - empty or fragment-only hrefs (same page anchors)
/// - hrefs that fail to parse
/// - any scheme other than HTTP(S) after resolution (`mailto:`, `javascript:`, ...)
///
/// # Examples
///
/// ```
/// use skein::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("http://a.test/x").unwrap();
/// let url = resolve_link("/about", &page).unwrap();
/// assert_eq!(url.as_str(), "http://a.test/about");
/// ```
pub fn resolve_link(href: &str, page: &Url) -> Result<Url, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if href.starts_with('#') {
        return Err(UrlError::FragmentOnly);
    }

    let absolute = page.join(href)?;
    normalize_parsed(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("http://a.test/x").unwrap()
    }

    #[test]
    fn test_root_relative() {
        let url = resolve_link("/about", &page()).unwrap();
        assert_eq!(url.as_str(), "http://a.test/about");
    }

    #[test]
    fn test_path_relative() {
        let page = Url::parse("https://a.test/docs/intro").unwrap();
        let url = resolve_link("guide", &page).unwrap();
        assert_eq!(url.as_str(), "https://a.test/docs/guide");
    }

    #[test]
    fn test_resolves_against_fetched_page_host() {
        let page = Url::parse("https://other.test/deep/page").unwrap();
        let url = resolve_link("/b", &page).unwrap();
        assert_eq!(url.as_str(), "https://other.test/b");
    }

    #[test]
    fn test_scheme_relative() {
        let url = resolve_link("//cdn.test/lib", &page()).unwrap();
        assert_eq!(url.as_str(), "http://cdn.test/lib");
    }

    #[test]
    fn test_absolute_link_kept() {
        let url = resolve_link("https://other.test/b?x=1", &page()).unwrap();
        assert_eq!(url.as_str(), "https://other.test/b?x=1");
    }

    #[test]
    fn test_fragment_stripped_from_relative() {
        let url = resolve_link("/a#part", &page()).unwrap();
        assert_eq!(url.as_str(), "http://a.test/a");
    }

    #[test]
    fn test_skip_fragment_only() {
        assert_eq!(resolve_link("#top", &page()), Err(UrlError::FragmentOnly));
    }

    #[test]
    fn test_skip_empty() {
        assert_eq!(resolve_link("  ", &page()), Err(UrlError::Empty));
    }

    #[test]
    fn test_skip_javascript() {
        let result = resolve_link("javascript:void(0)", &page());
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(s)) if s == "javascript"));
    }

    #[test]
    fn test_skip_mailto() {
        let result = resolve_link("mailto:someone@a.test", &page());
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_skip_ftp() {
        let result = resolve_link("ftp://files.a.test/pub", &page());
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_unparsable_href() {
        let result = resolve_link("http://[::1", &page());
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }
}
