//! Server shared state
//!
//! Holds configuration and the upstream HTTP client.

use crate::config::Config;
use crate::error::Result;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("store-finder/", env!("CARGO_PKG_VERSION"));

/// Shared state for the HTTP server
pub struct AppState {
    /// Configuration
    pub config: Config,

    /// Client for Overpass and OSRM
    client: reqwest::Client,

    started: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            config,
            client,
            started: Instant::now(),
        })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn overpass_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.overpass_timeout_secs)
    }

    pub fn osrm_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.osrm_timeout_secs)
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }
}
