use lazy_static::lazy_static;
use scraper::{Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref A: Selector = Selector::parse("a[href]").expect(E);
}

/// Result hrefs look like `/url?q=https://www.example.com/subpage&sa=U&ved=...`.
const RESULT_PREFIX: &str = "/url?q=";
const CACHE_HOST: &str = "webcache.googleusercontent.com";

/// Target links of the results on a Google results page, in page order.
///
/// The `&sa=...` tracking parameters are left in place.
pub fn extract_result_links(doc: &Html) -> Vec<String> {
    doc.select(&A)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.contains(CACHE_HOST))
        .filter_map(|href| href.strip_prefix(RESULT_PREFIX))
        .filter(|target| target.starts_with('h'))
        .map(ToString::to_string)
        .collect()
}
