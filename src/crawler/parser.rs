//! HTML link extraction
//!
//! This module scans markup for anchor elements and yields their raw `href`
//! values. Resolution and filtering of those values happen in the fetch task,
//! against the URL of the page they were found on.

use scraper::{Html, Selector};

/// Raw href values from one page, in document order
///
/// Finite and non-restartable: once consumed, the page must be scanned again.
pub type Hrefs = std::vec::IntoIter<String>;

/// Produces the raw hrefs of anchor elements found in markup
pub trait LinkExtractor: Send + Sync + 'static {
    fn extract(&self, markup: &str) -> Hrefs;
}

/// [`LinkExtractor`] for `<a href="...">` elements, built on `scraper`
///
/// Values are returned untouched: relative, malformed and non-HTTP hrefs are
/// all yielded so the caller can decide what to keep. Malformed markup is
/// recovered by the HTML5 parser rather than rejected.
///
/// # Example
///
/// ```
/// use skein::crawler::{AnchorExtractor, LinkExtractor};
///
/// let html = r#"<a href="/a">A</a><a name="x">no href</a><a href="mailto:x@y.z">M</a>"#;
/// let hrefs: Vec<String> = AnchorExtractor.extract(html).collect();
/// assert_eq!(hrefs, vec!["/a", "mailto:x@y.z"]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorExtractor;

impl LinkExtractor for AnchorExtractor {
    fn extract(&self, markup: &str) -> Hrefs {
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new().into_iter();
        };

        let document = Html::parse_document(markup);
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_owned)
            .collect::<Vec<_>>()
            .into_iter()
    }
}
