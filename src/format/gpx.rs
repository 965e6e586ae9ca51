//! GPX output formatter
//!
//! Origin and stores become waypoints; the active route becomes a track.

use crate::error::Result;
use crate::format::html::escape_for_display;
use crate::format::{OutputFormatter, Report};

/// GPX formatter - outputs a GPX file
pub struct GpxFormatter;

fn xml(text: &str) -> String {
    escape_for_display(Some(text))
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoints and route track"
    }

    fn format(&self, report: &Report) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="store-finder">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str("    <name>Convenience stores</name>\n");
        gpx.push_str(&format!("    <time>{}</time>\n", report.generated_at.to_rfc3339()));
        gpx.push_str("  </metadata>\n");

        if let Some(origin) = report.origin {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, origin.lat, origin.lng));
            gpx.push('\n');
            gpx.push_str("    <name>Origin</name>\n");
            gpx.push_str("    <sym>flag</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        for poi in &report.results {
            gpx.push_str(&format!(
                r#"  <wpt lat="{}" lon="{}">"#,
                poi.position.lat, poi.position.lng
            ));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", xml(&poi.name)));
            if poi.has_address() {
                gpx.push_str(&format!("    <desc>{}</desc>\n", xml(&poi.address)));
            }
            gpx.push_str("    <sym>shopping</sym>\n");
            gpx.push_str("  </wpt>\n");
        }

        if let Some(route) = &report.route {
            gpx.push_str("  <trk>\n");
            gpx.push_str(&format!("    <name>Route to {}</name>\n", xml(&route.store.name)));
            gpx.push_str(&format!(
                "    <desc>{:.2} km, {} min</desc>\n",
                route.distance_km, route.eta_minutes
            ));
            gpx.push_str("    <trkseg>\n");
            for p in &route.route.geometry {
                gpx.push_str(&format!(r#"      <trkpt lat="{}" lon="{}"/>"#, p.lat, p.lng));
                gpx.push('\n');
            }
            gpx.push_str("    </trkseg>\n");
            gpx.push_str("  </trk>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
