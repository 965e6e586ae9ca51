//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/store-finder/config.toml

pub mod defaults;

use crate::constants::api::{OSRM_URL, OSRM_URL_ENV, OVERPASS_URL, OVERPASS_URL_ENV};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend the client queries
    #[serde(default)]
    pub backend: BackendConfig,

    /// Map view settings
    #[serde(default)]
    pub map: MapConfig,

    /// Backend proxy server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Default values for CLI output
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Backend the client queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL serving /api/nearby and /api/route
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

/// Map view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial center latitude
    #[serde(default = "default_center_lat")]
    pub center_lat: f64,

    /// Initial center longitude
    #[serde(default = "default_center_lng")]
    pub center_lng: f64,

    /// Initial zoom
    #[serde(default = "default_zoom")]
    pub zoom: u8,

    /// Zoom when flying to a selected store
    #[serde(default = "default_fly_to_zoom")]
    pub fly_to_zoom: u8,

    /// Padding in pixels when fitting to a route
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,

    /// Route line color
    #[serde(default = "default_route_color")]
    pub route_color: String,

    /// Route line weight
    #[serde(default = "default_route_weight")]
    pub route_weight: u32,

    /// Search radius circle color
    #[serde(default = "default_radius_color")]
    pub radius_color: String,
}

/// Backend proxy server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Overpass interpreter URL
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// OSRM server URL
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// Directory with the front-end files
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Overpass request timeout in seconds
    #[serde(default = "default_overpass_timeout")]
    pub overpass_timeout_secs: u64,

    /// OSRM request timeout in seconds
    #[serde(default = "default_osrm_timeout")]
    pub osrm_timeout_secs: u64,
}

/// Default values for CLI output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

// Default value functions for serde
fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_center_lat() -> f64 {
    DEFAULT_CENTER_LAT
}
fn default_center_lng() -> f64 {
    DEFAULT_CENTER_LNG
}
fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
fn default_fly_to_zoom() -> u8 {
    DEFAULT_FLY_TO_ZOOM
}
fn default_fit_padding() -> u32 {
    DEFAULT_FIT_PADDING
}
fn default_route_color() -> String {
    DEFAULT_ROUTE_COLOR.to_string()
}
fn default_route_weight() -> u32 {
    DEFAULT_ROUTE_WEIGHT
}
fn default_radius_color() -> String {
    DEFAULT_RADIUS_COLOR.to_string()
}
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_overpass_url() -> String {
    OVERPASS_URL.to_string()
}
fn default_osrm_url() -> String {
    OSRM_URL.to_string()
}
fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}
fn default_overpass_timeout() -> u64 {
    DEFAULT_OVERPASS_TIMEOUT_SECS
}
fn default_osrm_timeout() -> u64 {
    DEFAULT_OSRM_TIMEOUT_SECS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: default_center_lat(),
            center_lng: default_center_lng(),
            zoom: default_zoom(),
            fly_to_zoom: default_fly_to_zoom(),
            fit_padding: default_fit_padding(),
            route_color: default_route_color(),
            route_weight: default_route_weight(),
            radius_color: default_radius_color(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            overpass_url: default_overpass_url(),
            osrm_url: default_osrm_url(),
            static_dir: default_static_dir(),
            overpass_timeout_secs: default_overpass_timeout(),
            osrm_timeout_secs: default_osrm_timeout(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl MapConfig {
    /// Initial map center
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(self.center_lat, self.center_lng)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            // Create default config
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Apply `OVERPASS_URL` / `OSRM_URL` from the environment
    pub fn with_env_overrides(mut self) -> Self {
        self.apply_upstream_overrides(
            std::env::var(OVERPASS_URL_ENV).ok(),
            std::env::var(OSRM_URL_ENV).ok(),
        );
        self
    }

    fn apply_upstream_overrides(&mut self, overpass: Option<String>, osrm: Option<String>) {
        if let Some(url) = overpass.filter(|u| !u.is_empty()) {
            self.server.overpass_url = url;
        }
        if let Some(url) = osrm.filter(|u| !u.is_empty()) {
            self.server.osrm_url = url;
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["backend", "base_url"] => Some(self.backend.base_url.clone()),

            ["map", "center_lat"] => Some(self.map.center_lat.to_string()),
            ["map", "center_lng"] => Some(self.map.center_lng.to_string()),
            ["map", "zoom"] => Some(self.map.zoom.to_string()),
            ["map", "fly_to_zoom"] => Some(self.map.fly_to_zoom.to_string()),
            ["map", "fit_padding"] => Some(self.map.fit_padding.to_string()),
            ["map", "route_color"] => Some(self.map.route_color.clone()),
            ["map", "route_weight"] => Some(self.map.route_weight.to_string()),
            ["map", "radius_color"] => Some(self.map.radius_color.clone()),

            ["server", "host"] => Some(self.server.host.clone()),
            ["server", "port"] => Some(self.server.port.to_string()),
            ["server", "overpass_url"] => Some(self.server.overpass_url.clone()),
            ["server", "osrm_url"] => Some(self.server.osrm_url.clone()),
            ["server", "static_dir"] => Some(self.server.static_dir.clone()),
            ["server", "overpass_timeout_secs"] => {
                Some(self.server.overpass_timeout_secs.to_string())
            }
            ["server", "osrm_timeout_secs"] => Some(self.server.osrm_timeout_secs.to_string()),

            ["defaults", "format"] => Some(self.defaults.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["backend", "base_url"] => {
                self.backend.base_url = value.to_string();
            }

            ["map", "center_lat"] => {
                self.map.center_lat = parse_value(key, value)?;
            }
            ["map", "center_lng"] => {
                self.map.center_lng = parse_value(key, value)?;
            }
            ["map", "zoom"] => {
                self.map.zoom = parse_value(key, value)?;
            }
            ["map", "fly_to_zoom"] => {
                self.map.fly_to_zoom = parse_value(key, value)?;
            }
            ["map", "fit_padding"] => {
                self.map.fit_padding = parse_value(key, value)?;
            }
            ["map", "route_color"] => {
                self.map.route_color = value.to_string();
            }
            ["map", "route_weight"] => {
                self.map.route_weight = parse_value(key, value)?;
            }
            ["map", "radius_color"] => {
                self.map.radius_color = value.to_string();
            }

            ["server", "host"] => {
                self.server.host = value.to_string();
            }
            ["server", "port"] => {
                self.server.port = parse_value(key, value)?;
            }
            ["server", "overpass_url"] => {
                self.server.overpass_url = value.to_string();
            }
            ["server", "osrm_url"] => {
                self.server.osrm_url = value.to_string();
            }
            ["server", "static_dir"] => {
                self.server.static_dir = value.to_string();
            }
            ["server", "overpass_timeout_secs"] => {
                self.server.overpass_timeout_secs = parse_value(key, value)?;
            }
            ["server", "osrm_timeout_secs"] => {
                self.server.osrm_timeout_secs = parse_value(key, value)?;
            }

            ["defaults", "format"] => {
                self.defaults.format = value.to_string();
            }

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "backend.base_url",
            "map.center_lat",
            "map.center_lng",
            "map.zoom",
            "map.fly_to_zoom",
            "map.fit_padding",
            "map.route_color",
            "map.route_weight",
            "map.radius_color",
            "server.host",
            "server.port",
            "server.overpass_url",
            "server.osrm_url",
            "server.static_dir",
            "server.overpass_timeout_secs",
            "server.osrm_timeout_secs",
            "defaults.format",
        ]
    }

    /// Get server address as "host:port"
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
}
