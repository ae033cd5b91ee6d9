use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

pub mod geo;
pub mod google;
pub mod links;
pub mod page;
pub mod postcode;
pub mod report;

mod distance;
mod error;
mod utils;

pub use distance::{DistanceResolver, DistanceSample};
pub use error::FinderError;
pub use postcode::Postcode;
pub use report::{LogReporter, NoopReporter, Reporter};
pub use utils::{format_row, http_client};

/// Search terms plus the results page to read. Pages start at 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
    page: u32,
    ignore_subdomains: bool,
}

impl SearchQuery {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms.into_iter().map(Into::into).collect(),
            page: 1,
            ignore_subdomains: false,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Drop result links that sit under the path of another result link.
    pub fn with_ignore_subdomains(mut self, ignore_subdomains: bool) -> Self {
        self.ignore_subdomains = ignore_subdomains;
        self
    }

    pub fn terms(&self) -> &[String] {
        self.terms.as_slice()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn ignore_subdomains(&self) -> bool {
        self.ignore_subdomains
    }
}

/// Source of raw result links for a query.
///
/// Returns nothing for empty terms or page 0, and on any network failure.
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn links_for(&self, query: &SearchQuery) -> Vec<String>;
}

/// Human visible text of a page. Returns nothing on any network failure.
#[async_trait::async_trait]
pub trait PageTextProvider: Send + Sync {
    async fn visible_text(&self, url: &str) -> Vec<String>;
}

/// Distance in kilometers between two normalized GB postcodes, `None` when
/// either one cannot be located.
pub trait GeoDistanceProvider {
    fn query(&self, a: &Postcode, b: &Postcode) -> Option<f64>;
}

/// An in-range postcode, the first page it was seen on, and its distance
/// from home.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostcodeResult {
    postcode: Postcode,
    url: String,
    #[serde(rename = "distance_km")]
    distance: f64,
}

impl PostcodeResult {
    pub fn new(postcode: Postcode, url: String, distance: f64) -> Self {
        Self {
            postcode,
            url,
            distance,
        }
    }

    pub fn postcode(&self) -> &Postcode {
        &self.postcode
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }
}

#[derive(Debug, Default)]
pub struct Outcome {
    /// In-range results, in discovery order.
    pub results: Vec<PostcodeResult>,
    /// Every postcode met during the run, resolvable or not.
    pub seen: HashSet<Postcode>,
}

/// Runs searches and turns the result pages into nearby postcodes.
pub struct Finder<S, P, G> {
    search: S,
    pages: P,
    resolver: DistanceResolver<G>,
}

impl<S, P, G> Finder<S, P, G>
where
    S: SearchProvider,
    P: PageTextProvider,
    G: GeoDistanceProvider,
{
    pub fn new(search: S, pages: P, geo: G) -> Self {
        Self {
            search,
            pages,
            resolver: DistanceResolver::new(geo),
        }
    }

    /// Collects the result links of `query` and visits them one at a time.
    ///
    /// Each postcode is classified once, on the first page it appears on;
    /// `distance_limit` is inclusive. Only a malformed `home` or limit is an
    /// error, and both are checked before anything is fetched.
    pub async fn run<R: Reporter>(
        &self,
        query: &SearchQuery,
        home: &str,
        distance_limit: f64,
        reporter: &mut R,
    ) -> Result<Outcome, FinderError> {
        let home = Postcode::parse(home)?;
        if distance_limit.is_nan() || distance_limit < 0.0 {
            return Err(FinderError::InvalidDistanceLimit(distance_limit));
        }

        debug!("Collecting links for {:?} (page {})", query.terms(), query.page());
        let raw_links = self.search.links_for(query).await;
        let links = links::collect(raw_links, query.ignore_subdomains());
        info!("{} result links", links.len());

        let mut outcome = Outcome::default();
        for (i, url) in links.iter().enumerate() {
            reporter.page_started(i, links.len(), url);
            self.handle(url, &home, distance_limit, &mut outcome, reporter)
                .await;
        }

        info!(
            "Done: {} in range, {} postcodes seen",
            outcome.results.len(),
            outcome.seen.len()
        );
        Ok(outcome)
    }

    async fn handle<R: Reporter>(
        &self,
        url: &str,
        home: &Postcode,
        distance_limit: f64,
        outcome: &mut Outcome,
        reporter: &mut R,
    ) {
        debug!("Visit {}", url);
        let fragments = self.pages.visible_text(url).await;
        let candidates = postcode::extract_all(&fragments);
        debug!(
            "{} fragments, {} postcodes on {}",
            fragments.len(),
            candidates.len(),
            url
        );

        for pc in candidates {
            if !outcome.seen.insert(pc.clone()) {
                continue;
            }

            match self.resolver.distance(&pc, home) {
                DistanceSample::Unknown => reporter.unresolved(&pc, url),
                DistanceSample::Km(km) if km <= distance_limit => {
                    let result = PostcodeResult::new(pc, url.to_string(), km);
                    reporter.in_range(&result);
                    outcome.results.push(result);
                }
                DistanceSample::Km(km) => reporter.out_of_range(&pc, url, km),
            }
        }
    }
}
