//! Overpass API client
//!
//! Finds convenience stores around a point and converts the OSM elements
//! into GeoJSON point features.

use crate::constants::api::{SHOP_KIND, UNNAMED_STORE};
use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::query::wire::{Feature, FeatureCollection, Geometry};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// Overpass interpreter response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// Center of a way or relation (`out center`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One OSM node, way or relation
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: Map<String, Value>,
}

impl OverpassElement {
    /// Node position, or the center for ways and relations
    pub fn position(&self) -> Option<GeoPoint> {
        if self.kind == "node" {
            Some(GeoPoint::new(self.lat?, self.lon?))
        } else {
            self.center.map(|c| GeoPoint::new(c.lat, c.lon))
        }
    }

    /// Name, falling back to brand, then a placeholder
    pub fn display_name(&self) -> String {
        ["name", "brand"]
            .iter()
            .filter_map(|key| self.tags.get(*key).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .unwrap_or(UNNAMED_STORE)
            .to_string()
    }

    /// Point feature for this element; None if it has no position
    ///
    /// Tags are kept both flattened into the properties and under `tags`.
    pub fn to_feature(&self) -> Option<Feature> {
        let position = self.position()?;

        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(self.display_name()));
        for (key, value) in &self.tags {
            properties.insert(key.clone(), value.clone());
        }
        properties.insert("osm_id".to_string(), Value::from(self.id));
        properties.insert("type".to_string(), Value::String(self.kind.clone()));
        properties.insert("tags".to_string(), Value::Object(self.tags.clone()));

        Some(Feature::new(Geometry::point(position), properties))
    }
}

/// Overpass QL for stores within `radius_meters` of `center`
pub fn build_query(center: GeoPoint, radius_meters: u32) -> String {
    let around = format!("around:{},{},{}", radius_meters, center.lat, center.lng);
    let filter = format!("[\"shop\"=\"{}\"]", SHOP_KIND);
    format!(
        "[out:json];\n(\n  node({around}){filter};\n  way({around}){filter};\n  relation({around}){filter};\n);\nout center tags;\n",
        around = around,
        filter = filter
    )
}

/// Convert a response into a feature collection, skipping elements
/// without coordinates
pub fn to_collection(response: &OverpassResponse) -> FeatureCollection {
    FeatureCollection::new(
        response
            .elements
            .iter()
            .filter_map(OverpassElement::to_feature)
            .collect(),
    )
}

/// Query the interpreter at `url`
pub async fn find_stores(
    client: &reqwest::Client,
    url: &str,
    timeout: Duration,
    center: GeoPoint,
    radius_meters: u32,
) -> Result<OverpassResponse> {
    let query = build_query(center, radius_meters);
    debug!("Overpass query around {} ({} m)", center, radius_meters);

    let response = client
        .post(url)
        .timeout(timeout)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(format!("data={}", urlencoding::encode(&query)))
        .send()
        .await
        .map_err(|e| Error::Upstream(format!("Overpass request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::Upstream(format!(
            "Overpass request failed: status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Overpass request failed: {}", e)))
}
