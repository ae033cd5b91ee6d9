use crate::{GeoDistanceProvider, Postcode};
use tracing::debug;

/// Outcome of a distance lookup between two postcodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceSample {
    Km(f64),
    /// One of the postcodes is not in the lookup data, or no distance exists.
    Unknown,
}

/// Turns the raw answer of a [`GeoDistanceProvider`] into a [`DistanceSample`].
///
/// Both postcodes must already be normalized.
#[derive(Debug)]
pub struct DistanceResolver<G> {
    geo: G,
}

impl<G: GeoDistanceProvider> DistanceResolver<G> {
    pub fn new(geo: G) -> Self {
        Self { geo }
    }

    pub fn distance(&self, a: &Postcode, b: &Postcode) -> DistanceSample {
        match self.geo.query(a, b) {
            Some(km) if km.is_finite() && km >= 0.0 => DistanceSample::Km(km),
            Some(km) => {
                debug!("Discard distance {} between {} and {}", km, a, b);
                DistanceSample::Unknown
            }
            None => DistanceSample::Unknown,
        }
    }

    #[cfg(test)]
    pub(crate) fn provider(&self) -> &G {
        &self.geo
    }
}
