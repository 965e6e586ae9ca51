//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{OutputFormatter, Report};
use crate::geo::haversine_distance;

/// Text formatter - outputs human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        match report.origin {
            Some(origin) => output.push_str(&format!("Stores near {}\n", origin)),
            None => output.push_str("No origin picked\n"),
        }
        if !report.status.is_empty() {
            output.push_str(&format!("Status: {}\n", report.status));
        }

        if !report.results.is_empty() {
            output.push_str("\nResults:\n");
        }
        for (i, poi) in report.results.iter().enumerate() {
            output.push_str(&format!("  {:>2}. {}", i + 1, poi.name));
            if poi.has_address() {
                output.push_str(&format!(" ({})", poi.address));
            }
            // Straight-line, not driving, distance
            if let Some(origin) = report.origin {
                let km = haversine_distance(origin, poi.position) / 1000.0;
                output.push_str(&format!(" - {:.2} km away", km));
            }
            output.push('\n');
        }

        if let Some(route) = &report.route {
            output.push_str(&format!(
                "\nRoute to #{} {}:\n",
                route.target + 1,
                route.store.name
            ));
            output.push_str(&format!("  Distance: {:.2} km\n", route.distance_km));
            output.push_str(&format!("  ETA: {} min\n", route.eta_minutes));
            output.push_str(&format!("  Points: {}\n", route.route.geometry.len()));
        }

        Ok(output)
    }
}
