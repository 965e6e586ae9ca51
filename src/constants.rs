//! Centralized constants for the store-finder crate
//!
//! Values shared by the controller, the CLI and the backend proxy.

/// Search settings
pub mod search {
    /// Nearby search radius in meters (fixed for this application)
    pub const SEARCH_RADIUS_METERS: u32 = 1000;

    /// Display name used when a store has no name
    pub const UNNAMED: &str = "Unnamed";
}

/// Status panel messages
pub mod status {
    pub const SEARCHING: &str = "Searching...";
    pub const FETCHING_ROUTE: &str = "Fetching route...";
    pub const PICK_ORIGIN_FIRST: &str = "Click the map to pick an origin first.";
}

/// External API endpoints used by the backend proxy
pub mod api {
    /// Public Overpass interpreter
    pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

    /// Public OSRM demo server
    pub const OSRM_URL: &str = "http://router.project-osrm.org";

    /// Environment variable overriding the Overpass URL
    pub const OVERPASS_URL_ENV: &str = "OVERPASS_URL";

    /// Environment variable overriding the OSRM URL
    pub const OSRM_URL_ENV: &str = "OSRM_URL";

    /// OSM shop tag value the proxy searches for
    pub const SHOP_KIND: &str = "convenience";

    /// Name used by the proxy for stores with neither name nor brand
    pub const UNNAMED_STORE: &str = "Unnamed convenience";
}
