//! HTTP API routes
//!
//! `/api/nearby` and `/api/route` proxy Overpass and OSRM and answer in the
//! GeoJSON shapes the query pipeline reads. Errors are plain-text bodies so
//! clients can show them as-is. The static page is served at `/` with its
//! assets under `/static`; any origin may call the API.

use crate::constants::search::SEARCH_RADIUS_METERS;
use crate::error::Error;
use crate::geo::GeoPoint;
use crate::query::wire::{Feature, FeatureCollection};
use crate::server::osrm;
use crate::server::overpass;
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::warn;

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_path = resolve_static_dir(&state.config.server.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/nearby", get(nearby_handler))
        .route("/api/route", get(route_handler))
        .route("/api/status", get(status_handler))
        .nest_service("/static", ServeDir::new(&static_path))
        .fallback_service(ServeDir::new(&static_path).append_index_html_on_directories(true))
        .layer(cors)
        .with_state(state)
}

/// Find the static files directory
///
/// Tries the configured path relative to cwd first, then next to the
/// executable.
fn resolve_static_dir(configured: &str) -> String {
    if Path::new(configured).exists() {
        return configured.to_string();
    }

    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(configured)))
        .filter(|path| path.exists())
        .map(|path| path.to_string_lossy().to_string())
        .unwrap_or_else(|| configured.to_string())
}

/// API error response (plain-text body)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, err: impl std::fmt::Display) -> Self {
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidCoordinates(_) => StatusCode::BAD_REQUEST,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, err)
    }
}

/// Nearby search query parameters
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius: u32,
}

fn default_radius() -> u32 {
    SEARCH_RADIUS_METERS
}

/// Route query parameters
#[derive(Debug, Deserialize)]
pub struct RouteParams {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

/// Stores around a point
///
/// GET /api/nearby?lat=&lon=&radius=
async fn nearby_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let center = GeoPoint::new(params.lat, params.lon);
    center.validate()?;

    if params.radius == 0 {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Radius must be positive"));
    }

    let response = overpass::find_stores(
        state.client(),
        &state.config.server.overpass_url,
        state.overpass_timeout(),
        center,
        params.radius,
    )
    .await
    .inspect_err(|e| warn!("nearby search failed: {}", e))?;

    Ok(Json(overpass::to_collection(&response)))
}

/// Driving route between two points
///
/// GET /api/route?start_lat=&start_lon=&end_lat=&end_lon=
async fn route_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RouteParams>,
) -> Result<Json<Feature>, ApiError> {
    let start = GeoPoint::new(params.start_lat, params.start_lon);
    let end = GeoPoint::new(params.end_lat, params.end_lon);
    start.validate()?;
    end.validate()?;

    let response = osrm::fetch_route(
        state.client(),
        &state.config.server.osrm_url,
        state.osrm_timeout(),
        start,
        end,
    )
    .await
    .inspect_err(|e| warn!("route request failed: {}", e))?;

    let route = response
        .first_route()
        .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e))?;

    Ok(Json(route.to_feature()))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Uptime in seconds
    pub uptime_secs: u64,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime().as_secs(),
    })
}
