//! Status panel messages

use crate::error::Error;
use crate::query::RouteResult;

const SEARCH_FAILED: &str = "Search failed: ";
const ROUTE_FAILED: &str = "Route failed: ";

pub fn stores_found(count: usize) -> String {
    format!("{} stores found", count)
}

pub fn search_failed(err: &Error) -> String {
    format!("{}{}", SEARCH_FAILED, err)
}

/// Distance in km (2 decimals) and ETA in whole minutes
pub fn route_summary(route: &RouteResult) -> String {
    format!(
        "Distance: {:.2} km, ETA: {} min",
        route.distance_km(),
        route.eta_minutes()
    )
}

pub fn route_failed(err: &Error) -> String {
    format!("{}{}", ROUTE_FAILED, err)
}

/// The reason carried by a failed-search status line
pub fn search_failure_reason(status: &str) -> Option<&str> {
    status.strip_prefix(SEARCH_FAILED)
}

/// The reason carried by a failed-route status line
pub fn route_failure_reason(status: &str) -> Option<&str> {
    status.strip_prefix(ROUTE_FAILED)
}
