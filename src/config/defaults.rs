//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default backend base URL the client queries
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

/// Initial map center (Hanoi)
pub const DEFAULT_CENTER_LAT: f64 = 21.0277644;
pub const DEFAULT_CENTER_LNG: f64 = 105.8341598;

/// Initial map zoom
pub const DEFAULT_ZOOM: u8 = 13;

/// Zoom used when flying to a selected store
pub const DEFAULT_FLY_TO_ZOOM: u8 = 16;

/// Padding in pixels when fitting the view to a route
pub const DEFAULT_FIT_PADDING: u32 = 50;

/// Route line style
pub const DEFAULT_ROUTE_COLOR: &str = "red";
pub const DEFAULT_ROUTE_WEIGHT: u32 = 4;

/// Search radius circle color
pub const DEFAULT_RADIUS_COLOR: &str = "#3388ff";

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 8000;

/// Directory served for the front-end
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Upstream request timeouts in seconds
pub const DEFAULT_OVERPASS_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OSRM_TIMEOUT_SECS: u64 = 20;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "store-finder";
