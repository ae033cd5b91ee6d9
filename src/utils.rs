use crate::FinderError;
use std::time::Duration;

pub(crate) fn strip_protocol(url: &str) -> &str {
    ["https://", "http://"]
        .iter()
        .find_map(|prefix| url.strip_prefix(*prefix))
        .unwrap_or(url)
}

/// One aligned output line: postcode, whole kilometers, then `extra`.
pub fn format_row(postcode: &str, km: f64, extra: &str) -> String {
    format!("{:10}{:6.0}km\t{}", postcode, km, extra)
}

/// Client shared by the search and page fetchers.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, FinderError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
