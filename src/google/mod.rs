mod results;

pub use results::extract_result_links;

use crate::{SearchProvider, SearchQuery};
use itertools::Itertools;
use scraper::Html;
use tracing::{debug, warn};

const SEARCH_URL: &str = "https://www.google.com/search";
const RESULTS_PER_PAGE: u32 = 10;

/// Reads one page of Google results through the plain HTML interface.
#[derive(Debug, Clone)]
pub struct GoogleSearch {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleSearch {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: SEARCH_URL.to_string(),
        }
    }

    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `None` for empty terms or page 0.
    pub fn search_url(&self, query: &SearchQuery) -> Option<String> {
        if query.terms().is_empty() || query.page() < 1 {
            return None;
        }

        let q = query
            .terms()
            .iter()
            .map(|term| urlencoding::encode(term))
            .join("+");
        let start = (query.page() - 1) * RESULTS_PER_PAGE;
        Some(format!("{}?q={}&start={}", self.base_url, q, start))
    }
}

#[async_trait::async_trait]
impl SearchProvider for GoogleSearch {
    async fn links_for(&self, query: &SearchQuery) -> Vec<String> {
        let Some(url) = self.search_url(query) else {
            debug!("Nothing to search for {:?}", query);
            return vec![];
        };

        debug!("Search {}", url);
        let html = match self.client.get(&url).send().await {
            Ok(response) => match response.text().await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Unreadable search results {}: {}", url, e);
                    return vec![];
                }
            },
            Err(e) => {
                warn!("Search failed {}: {}", url, e);
                return vec![];
            }
        };

        let links = {
            let doc = Html::parse_document(&html);
            extract_result_links(&doc)
        };
        debug!("{} raw result links", links.len());
        links
    }
}
