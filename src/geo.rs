use crate::{FinderError, GeoDistanceProvider, Postcode};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

// GeoNames postal code dump columns (e.g. `GB_full.txt`).
const POSTAL_CODE: usize = 1;
const LATITUDE: usize = 9;
const LONGITUDE: usize = 10;

const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn haversine_km((lat1, lng1): (f64, f64), (lat2, lng2): (f64, f64)) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[derive(Debug, Default)]
pub struct GeoNamesTable {
    coordinates: HashMap<Postcode, (f64, f64)>,
}

impl GeoNamesTable {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FinderError> {
        let path = path.as_ref();
        let table = Self::from_reader(BufReader::new(File::open(path)?))?;
        if table.is_empty() {
            warn!("No postcodes in {}, every distance will be unknown", path.display());
        } else {
            info!("Loaded {} postcodes from {}", table.len(), path.display());
        }
        Ok(table)
    }

    // Rows repeating a postcode are averaged.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, FinderError> {
        let mut sums: HashMap<Postcode, (f64, f64, u32)> = HashMap::new();

        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let Some((postcode, lat, lng)) = parse_row(&line) else {
                debug!("Skip row {}: {:?}", n + 1, line);
                continue;
            };

            let entry = sums.entry(postcode).or_insert((0.0, 0.0, 0));
            entry.0 += lat;
            entry.1 += lng;
            entry.2 += 1;
        }

        let coordinates = sums
            .into_iter()
            .map(|(pc, (lat, lng, count))| (pc, (lat / f64::from(count), lng / f64::from(count))))
            .collect();
        Ok(Self { coordinates })
    }

    pub fn coordinates(&self, postcode: &Postcode) -> Option<(f64, f64)> {
        self.coordinates.get(postcode).copied()
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

fn parse_row(line: &str) -> Option<(Postcode, f64, f64)> {
    let columns: Vec<&str> = line.split('\t').collect();
    let postcode = Postcode::parse(columns.get(POSTAL_CODE)?).ok()?;
    let lat: f64 = columns.get(LATITUDE)?.trim().parse().ok()?;
    let lng: f64 = columns.get(LONGITUDE)?.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some((postcode, lat, lng))
}

impl GeoDistanceProvider for GeoNamesTable {
    fn query(&self, a: &Postcode, b: &Postcode) -> Option<f64> {
        Some(haversine_km(self.coordinates(a)?, self.coordinates(b)?))
    }
}
