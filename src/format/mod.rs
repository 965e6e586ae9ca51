//! Output formatters
//!
//! Markup for the panel (`html`), status lines (`status`), and trait-based
//! report output for the one-shot commands (`json`, `text`, `gpx`).

pub mod gpx;
pub mod html;
pub mod json;
pub mod status;
pub mod text;

use crate::controller::session::SessionState;
use crate::error::Result;
use crate::geo::GeoPoint;
use crate::query::{PointOfInterest, RouteResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Route section of a report
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    /// Index of the store in `Report::results`
    pub target: usize,
    pub store: PointOfInterest,
    pub distance_km: f64,
    pub eta_minutes: i64,
    pub route: RouteResult,
}

/// Snapshot of a session for printing
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub origin: Option<GeoPoint>,
    pub status: String,
    pub results: Vec<PointOfInterest>,
    pub route: Option<RouteReport>,
}

impl Report {
    /// Capture the session as it is now
    pub fn from_session(session: &SessionState) -> Self {
        let route = session.active_route().and_then(|active| {
            let store = session.results().get(active.target)?.clone();
            Some(RouteReport {
                target: active.target,
                store,
                distance_km: active.route.distance_km(),
                eta_minutes: active.route.eta_minutes(),
                route: active.route.clone(),
            })
        });

        Self {
            generated_at: Utc::now(),
            origin: session.origin(),
            status: session.status().to_string(),
            results: session.results().clone(),
            route,
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a session report
    fn format(&self, report: &Report) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
        &gpx::GpxFormatter,
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}
