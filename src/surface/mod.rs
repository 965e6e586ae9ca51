//! Display surfaces
//!
//! The controller renders through two capabilities: the map (`MapSurface`)
//! and the text panel holding the status line and result list
//! (`InfoPanel`). Neither reports errors; viewport trouble is not a failure.
//!
//! ## Implementations
//! - `console` prints changes to a writer (terminal front-ends)
//! - `recording` records every call (tests, headless runs)

pub mod console;
pub mod recording;

use crate::config::MapConfig;
use crate::geo::{Bounds, GeoPoint};
use serde::{Deserialize, Serialize};

/// Stroke style for the route line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStyle {
    pub color: String,
    pub weight: u32,
}

/// Stroke style for the search radius circle (never filled)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleStyle {
    pub color: String,
}

/// Viewport and style settings the controller passes to the map
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub route_style: RouteStyle,
    pub circle_style: CircleStyle,
    pub fly_to_zoom: u8,
    pub fit_padding: u32,
}

impl From<&MapConfig> for ViewSettings {
    fn from(map: &MapConfig) -> Self {
        Self {
            route_style: RouteStyle {
                color: map.route_color.clone(),
                weight: map.route_weight,
            },
            circle_style: CircleStyle {
                color: map.radius_color.clone(),
            },
            fly_to_zoom: map.fly_to_zoom,
            fit_padding: map.fit_padding,
        }
    }
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from(&MapConfig::default())
    }
}

/// One row of the rendered result list
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    /// Position in the result set, shared with the map marker
    pub index: usize,
    /// Plain display name
    pub name: String,
    /// Plain display address, empty when unknown
    pub address: String,
    /// Escaped markup for the entry
    pub html: String,
}

/// Map widget capability
pub trait MapSurface {
    /// Create the origin marker on first call, move it afterwards
    fn place_or_move_origin(&mut self, p: GeoPoint);

    /// Create or move the search radius circle
    fn place_or_move_search_radius(&mut self, p: GeoPoint, radius_meters: f64, style: &CircleStyle);

    fn clear_result_markers(&mut self);

    /// Add a marker to the result layer; markers are indexed in insertion order
    fn add_result_marker(&mut self, p: GeoPoint, label_html: &str);

    /// Open the popup of the result marker at `index`
    fn open_result_marker(&mut self, index: usize);

    fn clear_route(&mut self);

    fn draw_route(&mut self, geometry: &[GeoPoint], style: &RouteStyle);

    fn fit_to_route(&mut self, bounds: Bounds, padding: u32);

    fn fly_to(&mut self, p: GeoPoint, zoom: u8);
}

/// Status line and result list capability
pub trait InfoPanel {
    fn set_status(&mut self, text: &str);

    /// Replace the result list
    fn render_results(&mut self, entries: &[ResultEntry]);

    /// Surface a warning that needs the user's attention
    fn warn(&mut self, text: &str);
}
