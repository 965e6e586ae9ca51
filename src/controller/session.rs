//! Session state
//!
//! The single mutable record behind one map view. Readers get `&SessionState`;
//! every mutation goes through the controller (the setters are private to
//! the `controller` module).

use crate::geo::GeoPoint;
use crate::query::{ResultSet, RouteResult};

/// View state derived from the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No origin picked yet
    Idle,
    /// Origin picked; no results yet, or results from a previous origin
    OriginSet,
    /// Origin and results for it
    ResultsShown,
    /// Origin, results and a route to one of them
    RouteShown,
}

impl std::fmt::Display for ViewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::OriginSet => write!(f, "origin set"),
            Self::ResultsShown => write!(f, "results shown"),
            Self::RouteShown => write!(f, "route shown"),
        }
    }
}

/// The route currently on the map and the result it leads to
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRoute {
    pub target: usize,
    pub route: RouteResult,
}

/// Session state for one view
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    origin: Option<GeoPoint>,
    results: ResultSet,
    /// True once `results` came from a search for the current origin
    results_current: bool,
    active_route: Option<ActiveRoute>,
    status: String,
    origin_generation: u64,
    route_generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    pub fn results(&self) -> &ResultSet {
        &self.results
    }

    pub fn active_route(&self) -> Option<&ActiveRoute> {
        self.active_route.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Incremented on every origin change
    pub fn origin_generation(&self) -> u64 {
        self.origin_generation
    }

    /// Incremented on every route request and every results change
    pub fn route_generation(&self) -> u64 {
        self.route_generation
    }

    pub fn view_state(&self) -> ViewState {
        match (self.origin, &self.active_route) {
            (None, _) => ViewState::Idle,
            (Some(_), Some(_)) => ViewState::RouteShown,
            (Some(_), None) if self.results_current && !self.results.is_empty() => {
                ViewState::ResultsShown
            }
            (Some(_), None) => ViewState::OriginSet,
        }
    }

    /// Set a new origin; invalidates the active route but keeps results
    pub(super) fn set_origin(&mut self, p: GeoPoint) -> u64 {
        self.origin = Some(p);
        self.origin_generation += 1;
        self.results_current = false;
        self.active_route = None;
        self.origin_generation
    }

    /// Replace results; invalidates the active route and pending routes
    pub(super) fn set_results(&mut self, results: ResultSet) {
        self.results = results;
        self.results_current = true;
        self.route_generation += 1;
        self.active_route = None;
    }

    /// Start a new route request; invalidates the active route
    pub(super) fn begin_route(&mut self) -> u64 {
        self.route_generation += 1;
        self.active_route = None;
        self.route_generation
    }

    /// Set the active route
    ///
    /// Refused (returns false) without an origin or with `target` outside
    /// the results.
    pub(super) fn set_active_route(&mut self, target: usize, route: RouteResult) -> bool {
        if self.origin.is_none() || target >= self.results.len() {
            return false;
        }
        self.active_route = Some(ActiveRoute { target, route });
        true
    }

    pub(super) fn set_status(&mut self, text: String) {
        self.status = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PointOfInterest;

    fn poi(i: usize) -> PointOfInterest {
        PointOfInterest {
            id: i.to_string(),
            position: GeoPoint::new(21.0 + i as f64 * 0.001, 105.8),
            name: format!("Store {}", i),
            address: String::new(),
        }
    }

    fn route() -> RouteResult {
        RouteResult {
            geometry: vec![GeoPoint::new(21.0, 105.8)],
            distance_meters: 100.0,
            duration_seconds: 60.0,
        }
    }

    #[test]
    fn test_initial_state() {
        let session = SessionState::new();
        assert_eq!(session.view_state(), ViewState::Idle);
        assert!(session.origin().is_none());
        assert!(session.results().is_empty());
        assert_eq!(session.origin_generation(), 0);
    }

    #[test]
    fn test_state_progression() {
        let mut session = SessionState::new();
        assert_eq!(session.set_origin(GeoPoint::new(21.0, 105.8)), 1);
        assert_eq!(session.view_state(), ViewState::OriginSet);

        session.set_results(vec![poi(0), poi(1)]);
        assert_eq!(session.view_state(), ViewState::ResultsShown);

        session.begin_route();
        assert!(session.set_active_route(1, route()));
        assert_eq!(session.view_state(), ViewState::RouteShown);
        assert_eq!(session.active_route().map(|r| r.target), Some(1));
    }

    #[test]
    fn test_new_origin_clears_route_keeps_results() {
        let mut session = SessionState::new();
        session.set_origin(GeoPoint::new(21.0, 105.8));
        session.set_results(vec![poi(0)]);
        session.set_active_route(0, route());

        session.set_origin(GeoPoint::new(21.1, 105.9));
        assert!(session.active_route().is_none());
        assert_eq!(session.results().len(), 1);
        assert_eq!(session.view_state(), ViewState::OriginSet);
        assert_eq!(session.origin_generation(), 2);
    }

    #[test]
    fn test_new_results_clear_route() {
        let mut session = SessionState::new();
        session.set_origin(GeoPoint::new(21.0, 105.8));
        session.set_results(vec![poi(0)]);
        session.set_active_route(0, route());

        session.set_results(vec![poi(0), poi(1)]);
        assert!(session.active_route().is_none());
    }

    #[test]
    fn test_zero_results_stay_origin_set() {
        let mut session = SessionState::new();
        session.set_origin(GeoPoint::new(21.0, 105.8));
        session.set_results(vec![]);
        assert_eq!(session.view_state(), ViewState::OriginSet);
    }

    #[test]
    fn test_active_route_requires_origin_and_target() {
        let mut session = SessionState::new();
        assert!(!session.set_active_route(0, route()));

        session.set_origin(GeoPoint::new(21.0, 105.8));
        assert!(!session.set_active_route(0, route()));

        session.set_results(vec![poi(0)]);
        assert!(!session.set_active_route(1, route()));
        assert!(session.set_active_route(0, route()));
    }
}
