use crate::PageTextProvider;
use scraper::{Html, Node};
use tracing::{debug, warn};

/// Text under these elements is never shown to a reader.
const HIDDEN_PARENTS: [&str; 5] = ["style", "script", "head", "title", "meta"];

/// Fetches pages over HTTP and keeps their visible text.
///
/// The timeout comes from the client; see [`crate::http_client`].
#[derive(Debug, Clone)]
pub struct HttpPageText {
    client: reqwest::Client,
}

impl HttpPageText {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send().await?.text().await
    }
}

#[async_trait::async_trait]
impl PageTextProvider for HttpPageText {
    async fn visible_text(&self, url: &str) -> Vec<String> {
        let html = match self.fetch(url).await {
            Ok(html) => html,
            Err(e) if e.is_timeout() => {
                warn!("Timed out fetching {}", url);
                return vec![];
            }
            Err(e) => {
                warn!("Failed fetching {}: {}", url, e);
                return vec![];
            }
        };

        let fragments = {
            let doc = Html::parse_document(&html);
            visible_text(&doc)
        };
        debug!("{} text fragments on {}", fragments.len(), url);
        fragments
    }
}

/// Trimmed, non-empty text nodes that a browser would render.
///
/// Text directly inside `style`, `script`, `head`, `title` or `meta`, or at
/// the document level, is skipped. Comments are not text nodes.
pub fn visible_text(doc: &Html) -> Vec<String> {
    doc.tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some((node, text)),
            _ => None,
        })
        .filter(|(node, _)| match node.parent().map(|p| p.value()) {
            Some(Node::Element(el)) => !HIDDEN_PARENTS.contains(&el.name()),
            _ => false,
        })
        .map(|(_, text)| text.trim())
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::time::Duration;

    #[test]
    fn test_visible_text() {
        let html = fs::read_to_string("tests/htmls/page.html").expect("Invalid file path");
        let doc = Html::parse_document(&html);

        assert_eq!(
            visible_text(&doc),
            vec![
                "Parkside Pools".to_string(),
                "Gonville Place, Cambridge".to_string(),
                "CB1 1LY".to_string(),
                "Opening times".to_string(),
                "Mon-Fri 7am - 10pm".to_string(),
                "Car park at".to_string(),
                "Queen Anne Terrace".to_string(),
                ", CB1 1ND.".to_string(),
            ]
        );
    }

    #[test]
    fn test_visible_text_feeds_extraction() {
        let html = fs::read_to_string("tests/htmls/page.html").expect("Invalid file path");
        let doc = Html::parse_document(&html);

        let found: Vec<String> = crate::postcode::extract_all(visible_text(&doc))
            .into_iter()
            .map(|pc| pc.to_string())
            .collect();
        assert_eq!(found, vec!["CB1 1LY".to_string(), "CB1 1ND".to_string()]);
    }

    #[test]
    fn test_visible_text_of_fragment() {
        let doc = Html::parse_document("plain text <!-- CB9 9ZZ --> <b>bold</b>");
        assert_eq!(
            visible_text(&doc),
            vec!["plain text".to_string(), "bold".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unreachable_page_gives_no_text() {
        let pages = HttpPageText::new(http_client(Duration::from_secs(1)).unwrap());
        assert!(pages.visible_text("http://127.0.0.1:9/").await.is_empty());
    }
}
