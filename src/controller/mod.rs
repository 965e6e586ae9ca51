//! Interaction controller
//!
//! Reacts to the two user inputs (map click, result click) and the two
//! query outcomes, keeping the session, the map and the info panel
//! consistent.
//!
//! Queries are split into a request half that returns a ticket and a
//! completion half that takes the ticket back. Tickets carry the
//! generations current when they were issued; a completion whose ticket
//! is no longer current is a stale response and is discarded.
//!
//! ```rust
//! use store_finder::controller::Controller;
//! use store_finder::geo::GeoPoint;
//! use store_finder::surface::recording::{RecordingPanel, RecordingSurface};
//!
//! let mut controller = Controller::new(RecordingSurface::new(), RecordingPanel::new());
//! let ticket = controller.map_clicked(GeoPoint::new(21.0277644, 105.8341598)).unwrap();
//! assert_eq!(ticket.radius_meters, 1000);
//!
//! controller.search_completed(&ticket, Ok(vec![]));
//! assert_eq!(controller.session().status(), "0 stores found");
//! ```

pub mod driver;
pub mod session;

use crate::constants::search::SEARCH_RADIUS_METERS;
use crate::constants::status::{FETCHING_ROUTE, PICK_ORIGIN_FIRST, SEARCHING};
use crate::error::{Error, Result};
use crate::format::{html, status};
use crate::geo::GeoPoint;
use crate::query::{ResultSet, RouteResult};
use crate::surface::{InfoPanel, MapSurface, ResultEntry, ViewSettings};
pub use session::{ActiveRoute, SessionState, ViewState};
use tracing::{debug, warn};

/// A nearby search the controller wants issued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchTicket {
    pub generation: u64,
    pub origin: GeoPoint,
    pub radius_meters: u32,
}

/// A route fetch the controller wants issued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTicket {
    pub origin_generation: u64,
    pub route_generation: u64,
    /// Index of the target in the result set
    pub target: usize,
    pub start: GeoPoint,
    pub end: GeoPoint,
}

/// Drives one map view
pub struct Controller<M: MapSurface, P: InfoPanel> {
    session: SessionState,
    map: M,
    panel: P,
    settings: ViewSettings,
}

impl<M: MapSurface, P: InfoPanel> Controller<M, P> {
    /// Create a controller with default view settings
    pub fn new(map: M, panel: P) -> Self {
        Self::with_settings(map, panel, ViewSettings::default())
    }

    pub fn with_settings(map: M, panel: P, settings: ViewSettings) -> Self {
        Self {
            session: SessionState::new(),
            map,
            panel,
            settings,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn into_parts(self) -> (M, P) {
        (self.map, self.panel)
    }

    fn set_status(&mut self, text: String) {
        self.panel.set_status(&text);
        self.session.set_status(text);
    }

    /// The map was clicked at `p`
    ///
    /// Moves the origin, clears any route and returns the search to issue.
    /// Fails only for coordinates outside the valid ranges, in which case
    /// nothing changes.
    pub fn map_clicked(&mut self, p: GeoPoint) -> Result<SearchTicket> {
        if let Err(e) = p.validate() {
            self.panel.warn(&e.to_string());
            return Err(e);
        }

        let generation = self.session.set_origin(p);
        self.map.clear_route();
        self.map.place_or_move_origin(p);
        self.map.place_or_move_search_radius(
            p,
            f64::from(SEARCH_RADIUS_METERS),
            &self.settings.circle_style,
        );
        self.set_status(SEARCHING.to_string());

        debug!("search #{} issued at {}", generation, p);
        Ok(SearchTicket {
            generation,
            origin: p,
            radius_meters: SEARCH_RADIUS_METERS,
        })
    }

    fn is_current_search(&self, ticket: &SearchTicket) -> bool {
        ticket.generation == self.session.origin_generation()
    }

    /// A nearby search finished
    ///
    /// Returns false when the ticket is stale and the outcome was discarded.
    pub fn search_completed(&mut self, ticket: &SearchTicket, outcome: Result<ResultSet>) -> bool {
        if !self.is_current_search(ticket) {
            debug!(
                "discarding stale search #{} (current #{})",
                ticket.generation,
                self.session.origin_generation()
            );
            return false;
        }

        match outcome {
            Ok(results) => self.show_results(results),
            Err(e) => {
                warn!("nearby search failed: {}", e);
                self.set_status(status::search_failed(&e));
            }
        }
        true
    }

    fn show_results(&mut self, results: ResultSet) {
        self.map.clear_route();
        self.map.clear_result_markers();

        let mut entries = Vec::with_capacity(results.len());
        for (index, poi) in results.iter().enumerate() {
            self.map.add_result_marker(poi.position, &html::popup_html(poi));
            entries.push(ResultEntry {
                index,
                name: poi.name.clone(),
                address: poi.address.clone(),
                html: html::list_entry_html(poi),
            });
        }
        self.panel.render_results(&entries);

        let count = results.len();
        self.session.set_results(results);
        self.set_status(status::stores_found(count));
    }

    /// The result list entry at `index` was clicked
    ///
    /// Without an origin this warns and returns `Error::NoOrigin`, issuing
    /// nothing. Otherwise focuses the result and returns the route to fetch.
    pub fn result_clicked(&mut self, index: usize) -> Result<RouteTicket> {
        let Some(start) = self.session.origin() else {
            self.panel.warn(PICK_ORIGIN_FIRST);
            return Err(Error::NoOrigin);
        };

        let Some(end) = self.session.results().get(index).map(|poi| poi.position) else {
            return Err(Error::NoSuchResult(index));
        };

        self.map.fly_to(end, self.settings.fly_to_zoom);
        self.map.open_result_marker(index);
        self.set_status(FETCHING_ROUTE.to_string());
        self.map.clear_route();

        let route_generation = self.session.begin_route();
        debug!("route #{} issued from {} to {}", route_generation, start, end);

        Ok(RouteTicket {
            origin_generation: self.session.origin_generation(),
            route_generation,
            target: index,
            start,
            end,
        })
    }

    fn is_current_route(&self, ticket: &RouteTicket) -> bool {
        ticket.origin_generation == self.session.origin_generation()
            && ticket.route_generation == self.session.route_generation()
    }

    /// A route fetch finished
    ///
    /// Returns false when the ticket is stale and the outcome was discarded.
    pub fn route_completed(&mut self, ticket: &RouteTicket, outcome: Result<RouteResult>) -> bool {
        if !self.is_current_route(ticket) {
            debug!("discarding stale route #{}", ticket.route_generation);
            return false;
        }

        match outcome {
            Ok(route) => {
                let summary = status::route_summary(&route);
                let bounds = route.bounds();
                let geometry = route.geometry.clone();
                if !self.session.set_active_route(ticket.target, route) {
                    return false;
                }

                self.map.draw_route(&geometry, &self.settings.route_style);
                // Empty geometry: nothing to fit
                if let Some(bounds) = bounds {
                    self.map.fit_to_route(bounds, self.settings.fit_padding);
                }
                self.set_status(summary);
            }
            Err(e) => {
                warn!("route fetch failed: {}", e);
                self.set_status(status::route_failed(&e));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PointOfInterest;
    use crate::surface::recording::{MapCall, RecordingPanel, RecordingSurface, Viewport};

    type TestController = Controller<RecordingSurface, RecordingPanel>;

    fn controller() -> TestController {
        Controller::new(RecordingSurface::new(), RecordingPanel::new())
    }

    fn origin() -> GeoPoint {
        GeoPoint::new(21.0277644, 105.8341598)
    }

    fn poi(i: usize, name: &str, address: &str) -> PointOfInterest {
        PointOfInterest {
            id: i.to_string(),
            position: GeoPoint::new(21.03 + i as f64 * 0.001, 105.84),
            name: name.to_string(),
            address: address.to_string(),
        }
    }

    fn three_stores() -> ResultSet {
        vec![
            poi(0, "Circle K", "10 Main St"),
            poi(1, "VinMart+", ""),
            poi(2, "FamilyMart", "5 Hang Bai"),
        ]
    }

    fn route() -> RouteResult {
        RouteResult {
            geometry: vec![GeoPoint::new(21.0277644, 105.8341598), GeoPoint::new(21.03, 105.84)],
            distance_meters: 2345.6,
            duration_seconds: 930.0,
        }
    }

    /// Controller with an origin and three results shown
    fn with_results() -> TestController {
        let mut c = controller();
        let ticket = c.map_clicked(origin()).unwrap();
        assert!(c.search_completed(&ticket, Ok(three_stores())));
        c
    }

    #[test]
    fn test_map_click_sets_origin_and_issues_one_search() {
        let mut c = controller();
        let ticket = c.map_clicked(origin()).unwrap();

        assert_eq!(ticket.origin, origin());
        assert_eq!(ticket.radius_meters, 1000);
        assert_eq!(c.session().origin(), Some(origin()));
        assert_eq!(c.session().status(), "Searching...");
        assert_eq!(c.session().view_state(), ViewState::OriginSet);
        assert_eq!(c.map().origin(), Some(origin()));
        assert_eq!(c.map().radius(), Some((origin(), 1000.0)));
    }

    #[test]
    fn test_invalid_click_changes_nothing() {
        let mut c = controller();
        let err = c.map_clicked(GeoPoint::new(95.0, 0.0)).unwrap_err();

        assert!(matches!(err, Error::InvalidCoordinates(_)));
        assert!(c.session().origin().is_none());
        assert!(c.map().calls().is_empty());
        assert_eq!(c.panel().warnings().len(), 1);
    }

    #[test]
    fn test_search_success_renders_in_order() {
        let c = with_results();

        assert_eq!(c.session().results().len(), 3);
        assert_eq!(c.session().status(), "3 stores found");
        assert_eq!(c.session().view_state(), ViewState::ResultsShown);

        let markers = c.map().markers();
        let entries = c.panel().entries();
        assert_eq!(markers.len(), 3);
        assert_eq!(entries.len(), 3);
        for (i, poi) in c.session().results().iter().enumerate() {
            assert_eq!(markers[i].0, poi.position);
            assert_eq!(entries[i].index, i);
            assert_eq!(entries[i].name, poi.name);
        }
        assert_eq!(markers[0].1, "<strong>Circle K</strong><br/>10 Main St");
        assert_eq!(markers[1].1, "<strong>VinMart+</strong>");
    }

    #[test]
    fn test_zero_results() {
        let mut c = controller();
        let ticket = c.map_clicked(origin()).unwrap();
        c.search_completed(&ticket, Ok(vec![]));

        assert_eq!(c.session().status(), "0 stores found");
        assert_eq!(c.session().view_state(), ViewState::OriginSet);
        assert!(c.map().markers().is_empty());
        assert_eq!(c.panel().renders(), 1);
    }

    #[test]
    fn test_search_failure_keeps_results() {
        let mut c = with_results();
        let ticket = c.map_clicked(GeoPoint::new(21.05, 105.85)).unwrap();
        c.search_completed(&ticket, Err(Error::SearchFailed("Overpass down".to_string())));

        assert_eq!(c.session().status(), "Search failed: Overpass down");
        assert_eq!(c.session().results().len(), 3);
        assert_eq!(c.map().markers().len(), 3);
        assert_eq!(c.session().origin(), Some(GeoPoint::new(21.05, 105.85)));
    }

    #[test]
    fn test_result_click_without_origin_warns_and_issues_nothing() {
        let mut c = controller();
        let err = c.result_clicked(0).unwrap_err();

        assert!(matches!(err, Error::NoOrigin));
        assert_eq!(c.panel().warnings(), ["Click the map to pick an origin first.".to_string()]);
        assert!(c.map().calls().is_empty());
        assert_eq!(c.session().route_generation(), 0);
    }

    #[test]
    fn test_result_click_out_of_range() {
        let mut c = with_results();
        assert!(matches!(c.result_clicked(7), Err(Error::NoSuchResult(7))));
    }

    #[test]
    fn test_result_click_issues_route_and_focuses() {
        let mut c = with_results();
        let target = c.session().results()[1].position;
        let ticket = c.result_clicked(1).unwrap();

        assert_eq!(ticket.start, origin());
        assert_eq!(ticket.end, target);
        assert_eq!(ticket.target, 1);
        assert_eq!(c.session().status(), "Fetching route...");
        assert_eq!(c.map().viewport(), Some(Viewport::Fly(target, 16)));
        assert_eq!(c.map().open_marker(), Some(1));
    }

    #[test]
    fn test_route_success() {
        let mut c = with_results();
        let ticket = c.result_clicked(0).unwrap();
        assert!(c.route_completed(&ticket, Ok(route())));

        assert_eq!(c.session().status(), "Distance: 2.35 km, ETA: 16 min");
        assert_eq!(c.session().view_state(), ViewState::RouteShown);
        assert_eq!(c.session().active_route().map(|r| r.target), Some(0));
        assert_eq!(c.map().route().map(|r| r.len()), Some(2));
        assert_eq!(c.map().route_style().map(|s| s.color.as_str()), Some("red"));
        assert!(c
            .map()
            .calls()
            .iter()
            .any(|call| matches!(call, MapCall::FitToRoute(_, 50))));
    }

    #[test]
    fn test_route_failure_reverts_to_results() {
        let mut c = with_results();
        let ticket = c.result_clicked(0).unwrap();
        c.route_completed(&ticket, Err(Error::RouteFailed("No route found".to_string())));

        assert_eq!(c.session().status(), "Route failed: No route found");
        assert!(c.session().active_route().is_none());
        assert!(c.map().route().is_none());
        assert_eq!(c.session().view_state(), ViewState::ResultsShown);
    }

    #[test]
    fn test_new_origin_discards_pending_route() {
        let mut c = with_results();
        let route_ticket = c.result_clicked(0).unwrap();

        let search_ticket = c.map_clicked(GeoPoint::new(21.05, 105.85)).unwrap();
        assert!(!c.route_completed(&route_ticket, Ok(route())));

        assert!(c.session().active_route().is_none());
        assert!(c.map().route().is_none());
        assert_eq!(c.session().status(), "Searching...");

        // The newer search still applies
        assert!(c.search_completed(&search_ticket, Ok(vec![poi(0, "A", "")])));
        assert_eq!(c.session().results().len(), 1);
    }

    #[test]
    fn test_stale_search_is_discarded() {
        let mut c = controller();
        let first = c.map_clicked(origin()).unwrap();
        let second = c.map_clicked(GeoPoint::new(21.05, 105.85)).unwrap();

        // Responses arrive in reverse order
        assert!(c.search_completed(&second, Ok(vec![poi(0, "Newer", "")])));
        assert!(!c.search_completed(&first, Ok(three_stores())));

        assert_eq!(c.session().results().len(), 1);
        assert_eq!(c.session().results()[0].name, "Newer");
        assert_eq!(c.map().markers().len(), 1);
        assert_eq!(c.session().status(), "1 stores found");
    }

    #[test]
    fn test_newer_result_click_discards_older_route() {
        let mut c = with_results();
        let first = c.result_clicked(0).unwrap();
        let second = c.result_clicked(2).unwrap();

        assert!(!c.route_completed(&first, Ok(route())));
        assert!(c.session().active_route().is_none());

        assert!(c.route_completed(&second, Ok(route())));
        assert_eq!(c.session().active_route().map(|r| r.target), Some(2));
    }

    #[test]
    fn test_new_results_discard_pending_route_to_old_list() {
        let mut c = with_results();
        let search = c.map_clicked(GeoPoint::new(21.05, 105.85)).unwrap();
        // Click an entry of the old list while the new search is pending
        let pending_route = c.result_clicked(0).unwrap();

        c.search_completed(&search, Ok(vec![poi(0, "Other", "")]));
        assert!(!c.route_completed(&pending_route, Ok(route())));
        assert!(c.session().active_route().is_none());
    }

    #[test]
    fn test_same_point_twice_moves_marker_and_searches_twice() {
        let mut c = controller();
        let first = c.map_clicked(origin()).unwrap();
        let second = c.map_clicked(origin()).unwrap();

        assert_ne!(first.generation, second.generation);
        assert_eq!(c.map().origin_markers_created(), 1);
        assert_eq!(
            c.map()
                .calls()
                .iter()
                .filter(|call| matches!(call, MapCall::PlaceOrigin(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_reclicking_result_refetches() {
        let mut c = with_results();
        let first = c.result_clicked(1).unwrap();
        c.route_completed(&first, Ok(route()));

        let second = c.result_clicked(1).unwrap();
        assert_ne!(first.route_generation, second.route_generation);
        // The old route is cleared while the new one is fetched
        assert!(c.session().active_route().is_none());
        assert!(c.map().route().is_none());
    }

    #[test]
    fn test_new_search_clears_drawn_route() {
        let mut c = with_results();
        let ticket = c.result_clicked(0).unwrap();
        c.route_completed(&ticket, Ok(route()));
        assert!(c.map().route().is_some());

        let search = c.map_clicked(GeoPoint::new(21.05, 105.85)).unwrap();
        assert!(c.map().route().is_none());
        c.search_completed(&search, Ok(three_stores()));
        assert!(c.session().active_route().is_none());
    }

    #[test]
    fn test_hostile_names_are_escaped_everywhere() {
        let mut c = controller();
        let ticket = c.map_clicked(origin()).unwrap();
        c.search_completed(
            &ticket,
            Ok(vec![poi(0, "<script>alert(1)</script>", "<b>x</b>")]),
        );

        let popup = &c.map().markers()[0].1;
        let entry = &c.panel().entries()[0].html;
        for html in [popup, entry] {
            assert!(!html.contains("<script>"));
            assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
            assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        }
    }
}
