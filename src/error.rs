#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    #[error("Invalid postcode: {0:?}")]
    InvalidPostcode(String),
    #[error("Invalid distance limit: {0} km")]
    InvalidDistanceLimit(f64),
    #[error("HTTP client error")]
    Http(#[from] reqwest::Error),
    #[error("Postcode table error")]
    Io(#[from] std::io::Error),
}
