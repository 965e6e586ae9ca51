//! Recording surfaces
//!
//! Keep every call and a model of what is on screen, so a session can be
//! inspected without a real map widget.

use crate::geo::{Bounds, GeoPoint};
use crate::surface::{CircleStyle, InfoPanel, MapSurface, ResultEntry, RouteStyle};

/// A call made on the map surface
#[derive(Debug, Clone, PartialEq)]
pub enum MapCall {
    PlaceOrigin(GeoPoint),
    PlaceRadius(GeoPoint, f64),
    ClearResultMarkers,
    AddResultMarker(GeoPoint, String),
    OpenResultMarker(usize),
    ClearRoute,
    DrawRoute(Vec<GeoPoint>),
    FitToRoute(Bounds, u32),
    FlyTo(GeoPoint, u8),
}

/// Last viewport instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Fit(Bounds),
    Fly(GeoPoint, u8),
}

/// Map surface that records calls and tracks the resulting scene
#[derive(Debug, Default)]
pub struct RecordingSurface {
    calls: Vec<MapCall>,
    origin: Option<GeoPoint>,
    origin_markers_created: usize,
    radius: Option<(GeoPoint, f64)>,
    markers: Vec<(GeoPoint, String)>,
    open_marker: Option<usize>,
    route: Option<(Vec<GeoPoint>, RouteStyle)>,
    viewport: Option<Viewport>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order
    pub fn calls(&self) -> &[MapCall] {
        &self.calls
    }

    /// Origin marker position, if placed
    pub fn origin(&self) -> Option<GeoPoint> {
        self.origin
    }

    /// How many origin markers were ever created (never more than one)
    pub fn origin_markers_created(&self) -> usize {
        self.origin_markers_created
    }

    pub fn radius(&self) -> Option<(GeoPoint, f64)> {
        self.radius
    }

    /// Result markers currently in the layer, in insertion order
    pub fn markers(&self) -> &[(GeoPoint, String)] {
        &self.markers
    }

    pub fn open_marker(&self) -> Option<usize> {
        self.open_marker
    }

    /// Route line currently drawn
    pub fn route(&self) -> Option<&[GeoPoint]> {
        self.route.as_ref().map(|(path, _)| path.as_slice())
    }

    pub fn route_style(&self) -> Option<&RouteStyle> {
        self.route.as_ref().map(|(_, style)| style)
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }
}

impl MapSurface for RecordingSurface {
    fn place_or_move_origin(&mut self, p: GeoPoint) {
        if self.origin.is_none() {
            self.origin_markers_created += 1;
        }
        self.origin = Some(p);
        self.calls.push(MapCall::PlaceOrigin(p));
    }

    fn place_or_move_search_radius(&mut self, p: GeoPoint, radius_meters: f64, _style: &CircleStyle) {
        self.radius = Some((p, radius_meters));
        self.calls.push(MapCall::PlaceRadius(p, radius_meters));
    }

    fn clear_result_markers(&mut self) {
        self.markers.clear();
        self.open_marker = None;
        self.calls.push(MapCall::ClearResultMarkers);
    }

    fn add_result_marker(&mut self, p: GeoPoint, label_html: &str) {
        self.markers.push((p, label_html.to_string()));
        self.calls
            .push(MapCall::AddResultMarker(p, label_html.to_string()));
    }

    fn open_result_marker(&mut self, index: usize) {
        if index < self.markers.len() {
            self.open_marker = Some(index);
        }
        self.calls.push(MapCall::OpenResultMarker(index));
    }

    fn clear_route(&mut self) {
        self.route = None;
        self.calls.push(MapCall::ClearRoute);
    }

    fn draw_route(&mut self, geometry: &[GeoPoint], style: &RouteStyle) {
        self.route = Some((geometry.to_vec(), style.clone()));
        self.calls.push(MapCall::DrawRoute(geometry.to_vec()));
    }

    fn fit_to_route(&mut self, bounds: Bounds, padding: u32) {
        self.viewport = Some(Viewport::Fit(bounds));
        self.calls.push(MapCall::FitToRoute(bounds, padding));
    }

    fn fly_to(&mut self, p: GeoPoint, zoom: u8) {
        self.viewport = Some(Viewport::Fly(p, zoom));
        self.calls.push(MapCall::FlyTo(p, zoom));
    }
}

/// Info panel that records status lines, list renders and warnings
#[derive(Debug, Default)]
pub struct RecordingPanel {
    statuses: Vec<String>,
    entries: Vec<ResultEntry>,
    renders: usize,
    warnings: Vec<String>,
}

impl RecordingPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status text (empty before the first update)
    pub fn status(&self) -> &str {
        self.statuses.last().map(String::as_str).unwrap_or("")
    }

    /// Every status text in order
    pub fn statuses(&self) -> &[String] {
        &self.statuses
    }

    /// Entries of the current list
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// Number of times the list was rendered
    pub fn renders(&self) -> usize {
        self.renders
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

impl InfoPanel for RecordingPanel {
    fn set_status(&mut self, text: &str) {
        self.statuses.push(text.to_string());
    }

    fn render_results(&mut self, entries: &[ResultEntry]) {
        self.entries = entries.to_vec();
        self.renders += 1;
    }

    fn warn(&mut self, text: &str) {
        self.warnings.push(text.to_string());
    }
}
