//! Query pipeline
//!
//! Issues the nearby-search and routing requests against the backend and
//! parses the responses into the data model. Both queries are single-shot:
//! no retry, no backoff, no timeout of their own.

pub mod http;
pub mod wire;

use crate::config::Config;
use crate::error::Result;
use crate::geo::{Bounds, GeoPoint};
use serde::{Deserialize, Serialize};

/// A store returned by the nearby search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    /// Stable within one response; synthesized from the index if absent
    pub id: String,
    pub position: GeoPoint,
    /// Display name ("Unnamed" when the backend has none)
    pub name: String,
    /// Display address, empty when none can be derived
    pub address: String,
}

impl PointOfInterest {
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }
}

/// Search results in the order the backend returned them
///
/// The order is the index shared by the result list and the map markers.
pub type ResultSet = Vec<PointOfInterest>;

/// A routed path with its length and travel time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub geometry: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteResult {
    /// Bounding box of the path, None for an empty geometry
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.geometry)
    }

    /// Distance in kilometers, rounded to 2 decimals
    pub fn distance_km(&self) -> f64 {
        (self.distance_meters / 1000.0 * 100.0).round() / 100.0
    }

    /// Travel time in whole minutes, rounded to nearest
    pub fn eta_minutes(&self) -> i64 {
        (self.duration_seconds / 60.0).round() as i64
    }
}

/// Trait for the backend queries the controller depends on
pub trait QueryPipeline: Send + Sync {
    /// Search for stores within `radius_meters` of `origin`
    ///
    /// Fails with `Error::SearchFailed`. An empty result is not a failure.
    fn search_nearby(
        &self,
        origin: GeoPoint,
        radius_meters: u32,
    ) -> impl std::future::Future<Output = Result<ResultSet>> + Send;

    /// Fetch a route between two points
    ///
    /// Fails with `Error::RouteFailed`.
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
    ) -> impl std::future::Future<Output = Result<RouteResult>> + Send;
}

/// Get the HTTP pipeline for the configured backend
pub fn get_pipeline(config: &Config) -> Result<http::HttpQueryPipeline> {
    http::HttpQueryPipeline::new(&config.backend.base_url)
}
