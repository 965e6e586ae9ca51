//! Error types for store-finder

use thiserror::Error;

/// Main error type for store-finder operations
#[derive(Error, Debug)]
pub enum Error {
    /// Nearby search failed; carries the backend's message
    #[error("{0}")]
    SearchFailed(String),

    /// Route fetch failed; carries the backend's message
    #[error("{0}")]
    RouteFailed(String),

    /// A route was requested before an origin was picked
    #[error("Click the map to pick an origin first.")]
    NoOrigin,

    #[error("No result at index {0}")]
    NoSuchResult(usize),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    /// An upstream service (Overpass, OSRM) failed or had nothing to return
    #[error("{0}")]
    Upstream(String),
}

/// Result type alias for store-finder operations
pub type Result<T> = std::result::Result<T, Error>;
