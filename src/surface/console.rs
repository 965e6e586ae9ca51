//! Console surfaces
//!
//! Render the session as text lines for the terminal front-ends.

use crate::geo::{Bounds, GeoPoint};
use crate::surface::{CircleStyle, InfoPanel, MapSurface, ResultEntry, RouteStyle};
use std::io::Write;
use tracing::debug;

/// Map surface that prints scene changes
pub struct ConsoleSurface<W: Write> {
    out: W,
    origin_placed: bool,
    markers: Vec<GeoPoint>,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            origin_placed: false,
            markers: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        // Terminal output is best-effort
        let _ = writeln!(self.out, "[map] {}", text);
    }
}

impl ConsoleSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MapSurface for ConsoleSurface<W> {
    fn place_or_move_origin(&mut self, p: GeoPoint) {
        let verb = if self.origin_placed { "moved to" } else { "placed at" };
        self.origin_placed = true;
        self.line(format_args!("origin {} {}", verb, p));
    }

    fn place_or_move_search_radius(&mut self, p: GeoPoint, radius_meters: f64, style: &CircleStyle) {
        debug!("radius circle color {}", style.color);
        self.line(format_args!("searching {} m around {}", radius_meters, p));
    }

    fn clear_result_markers(&mut self) {
        debug!("clearing {} result markers", self.markers.len());
        self.markers.clear();
    }

    fn add_result_marker(&mut self, p: GeoPoint, label_html: &str) {
        debug!("result marker {} at {}: {}", self.markers.len() + 1, p, label_html);
        self.markers.push(p);
    }

    fn open_result_marker(&mut self, index: usize) {
        if let Some(p) = self.markers.get(index).copied() {
            self.line(format_args!("store #{} at {}", index + 1, p));
        }
    }

    fn clear_route(&mut self) {
        debug!("route layer cleared");
    }

    fn draw_route(&mut self, geometry: &[GeoPoint], style: &RouteStyle) {
        self.line(format_args!(
            "route drawn: {} points ({}, weight {})",
            geometry.len(),
            style.color,
            style.weight
        ));
    }

    fn fit_to_route(&mut self, bounds: Bounds, padding: u32) {
        self.line(format_args!(
            "view fit to {} .. {} (padding {})",
            bounds.south_west, bounds.north_east, padding
        ));
    }

    fn fly_to(&mut self, p: GeoPoint, zoom: u8) {
        self.line(format_args!("view centered on {} at zoom {}", p, zoom));
    }
}

/// Info panel that prints the status line and result list
pub struct ConsolePanel<W: Write> {
    out: W,
}

impl<W: Write> ConsolePanel<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsolePanel<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> InfoPanel for ConsolePanel<W> {
    fn set_status(&mut self, text: &str) {
        let _ = writeln!(self.out, "{}", text);
    }

    fn render_results(&mut self, entries: &[ResultEntry]) {
        for entry in entries {
            if entry.address.is_empty() {
                let _ = writeln!(self.out, "  {:>2}. {}", entry.index + 1, entry.name);
            } else {
                let _ = writeln!(
                    self.out,
                    "  {:>2}. {} ({})",
                    entry.index + 1,
                    entry.name,
                    entry.address
                );
            }
        }
    }

    fn warn(&mut self, text: &str) {
        let _ = writeln!(self.out, "Warning: {}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_console_surface_origin_lines() {
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.place_or_move_origin(GeoPoint::new(21.0, 105.8));
        surface.place_or_move_origin(GeoPoint::new(21.1, 105.9));

        let text = output(surface.into_inner());
        assert!(text.contains("[map] origin placed at (21.000000, 105.800000)"));
        assert!(text.contains("[map] origin moved to (21.100000, 105.900000)"));
    }

    #[test]
    fn test_console_surface_open_marker() {
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.add_result_marker(GeoPoint::new(21.0, 105.8), "<strong>A</strong>");
        surface.open_result_marker(0);
        surface.open_result_marker(3);

        let text = output(surface.into_inner());
        assert_eq!(text, "[map] store #1 at (21.000000, 105.800000)\n");
    }

    #[test]
    fn test_console_panel() {
        let mut panel = ConsolePanel::new(Vec::new());
        panel.set_status("2 stores found");
        panel.render_results(&[
            ResultEntry {
                index: 0,
                name: "Circle K".to_string(),
                address: "10 Main St".to_string(),
                html: String::new(),
            },
            ResultEntry {
                index: 1,
                name: "Unnamed".to_string(),
                address: String::new(),
                html: String::new(),
            },
        ]);
        panel.warn("Click the map to pick an origin first.");

        let text = output(panel.into_inner());
        assert_eq!(
            text,
            "2 stores found\n   1. Circle K (10 Main St)\n   2. Unnamed\nWarning: Click the map to pick an origin first.\n"
        );
    }
}
