use crate::{utils, Postcode, PostcodeResult};
use tracing::{debug, info};

/// Observation hook for a run. Only in-range results end up in the returned
/// list; everything else is visible here.
pub trait Reporter {
    fn page_started(&mut self, _index: usize, _total: usize, _url: &str) {}
    fn in_range(&mut self, _result: &PostcodeResult) {}
    fn out_of_range(&mut self, _postcode: &Postcode, _url: &str, _km: f64) {}
    fn unresolved(&mut self, _postcode: &Postcode, _url: &str) {}
}

#[derive(Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Logs every classification as an aligned row.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn page_started(&mut self, index: usize, total: usize, url: &str) {
        info!(
            "Scraping page {}/{} ({})",
            index + 1,
            total,
            utils::strip_protocol(url)
        );
    }

    fn in_range(&mut self, result: &PostcodeResult) {
        info!(
            "{}",
            utils::format_row(result.postcode().as_str(), result.distance(), "in range")
        );
    }

    fn out_of_range(&mut self, postcode: &Postcode, _url: &str, km: f64) {
        info!("{}", utils::format_row(postcode.as_str(), km, "out of range"));
    }

    fn unresolved(&mut self, postcode: &Postcode, _url: &str) {
        debug!("No distance for {}", postcode);
    }
}
