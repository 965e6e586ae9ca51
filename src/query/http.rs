//! HTTP query pipeline
//!
//! Talks to the store-finder backend (`/api/nearby`, `/api/route`).

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::query::wire::{self, Feature, FeatureCollection};
use crate::query::{QueryPipeline, ResultSet, RouteResult};
use tracing::debug;

const USER_AGENT: &str = concat!("store-finder/", env!("CARGO_PKG_VERSION"));

/// Query pipeline backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpQueryPipeline {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQueryPipeline {
    /// Create a pipeline for the backend at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn nearby_url(&self, origin: GeoPoint, radius_meters: u32) -> String {
        format!(
            "{}/api/nearby?lat={}&lon={}&radius={}",
            self.base_url, origin.lat, origin.lng, radius_meters
        )
    }

    fn route_url(&self, start: GeoPoint, end: GeoPoint) -> String {
        format!(
            "{}/api/route?start_lat={}&start_lon={}&end_lat={}&end_lon={}",
            self.base_url, start.lat, start.lng, end.lat, end.lng
        )
    }

    /// GET `url` and return the body of a 2xx response
    ///
    /// Non-2xx responses fail with their body text as the message.
    async fn get_text(&self, url: &str) -> std::result::Result<String, String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            if body.is_empty() {
                return Err(format!("Backend returned status: {}", status));
            }
            return Err(body);
        }

        Ok(body)
    }
}

impl QueryPipeline for HttpQueryPipeline {
    async fn search_nearby(&self, origin: GeoPoint, radius_meters: u32) -> Result<ResultSet> {
        let body = self
            .get_text(&self.nearby_url(origin, radius_meters))
            .await
            .map_err(Error::SearchFailed)?;

        let collection: FeatureCollection = serde_json::from_str(&body)
            .map_err(|e| Error::SearchFailed(format!("Invalid search response: {}", e)))?;

        wire::result_set(&collection).map_err(Error::SearchFailed)
    }

    async fn fetch_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult> {
        let body = self
            .get_text(&self.route_url(start, end))
            .await
            .map_err(Error::RouteFailed)?;

        let feature: Feature = serde_json::from_str(&body)
            .map_err(|e| Error::RouteFailed(format!("Invalid route response: {}", e)))?;

        wire::route_result(&feature).map_err(Error::RouteFailed)
    }
}
