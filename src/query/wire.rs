//! GeoJSON wire types
//!
//! The backend speaks a small subset of GeoJSON: a FeatureCollection of
//! Point features for nearby search and a single line Feature for routes.
//! Positions are `[lon, lat]`, the reverse of `GeoPoint`.

use crate::constants::search::UNNAMED;
use crate::geo::GeoPoint;
use crate::query::{PointOfInterest, ResultSet, RouteResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Feature geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Vec<f64> },
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
}

impl Geometry {
    /// Point geometry from a `GeoPoint`
    pub fn point(p: GeoPoint) -> Self {
        Geometry::Point {
            coordinates: vec![p.lng, p.lat],
        }
    }

    /// All positions in path order; line parts are concatenated
    fn positions(&self) -> Vec<&[f64]> {
        match self {
            Geometry::Point { coordinates } => vec![coordinates.as_slice()],
            Geometry::LineString { coordinates } => {
                coordinates.iter().map(Vec::as_slice).collect()
            }
            Geometry::MultiLineString { coordinates } => coordinates
                .iter()
                .flatten()
                .map(Vec::as_slice)
                .collect(),
        }
    }
}

/// A single GeoJSON feature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default = "feature_type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(default)]
    pub geometry: Option<Geometry>,

    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

/// A GeoJSON feature collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_type")]
    pub kind: String,

    #[serde(default)]
    pub features: Vec<Feature>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

fn collection_type() -> String {
    "FeatureCollection".to_string()
}

impl Feature {
    /// Build a feature from geometry and properties
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: feature_type(),
            id: None,
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    fn props(&self) -> &Map<String, Value> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        self.properties
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(Map::new))
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: collection_type(),
            features,
        }
    }
}

/// Non-empty string property
fn prop_str<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    props
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Non-negative finite number property, 0 otherwise
fn prop_amount(props: &Map<String, Value>, key: &str) -> f64 {
    props
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0)
}

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Derive the display address from feature properties
///
/// Precedence: `address`, then tag `addr:full`, then
/// `addr:housenumber` + `addr:street`, then empty. Tags come from the
/// `tags` object when present, otherwise from the properties themselves
/// (some backends flatten OSM tags into properties).
pub fn resolve_address(props: &Map<String, Value>) -> String {
    if let Some(address) = prop_str(props, "address") {
        return address.to_string();
    }

    let tags = props
        .get("tags")
        .and_then(Value::as_object)
        .unwrap_or(props);

    if let Some(full) = prop_str(tags, "addr:full") {
        return full.to_string();
    }

    let number = prop_str(tags, "addr:housenumber").unwrap_or("");
    let street = prop_str(tags, "addr:street").unwrap_or("");
    format!("{} {}", number, street).trim().to_string()
}

/// Stable identifier for a feature at `index` in its response
fn resolve_id(feature: &Feature, index: usize) -> String {
    if let Some(id) = feature.id.as_ref().and_then(value_to_id) {
        return id;
    }

    let props = feature.props();
    match (
        props.get("osm_id").and_then(value_to_id),
        prop_str(props, "type"),
    ) {
        (Some(osm_id), Some(kind)) => format!("{}/{}", kind, osm_id),
        (Some(osm_id), None) => osm_id,
        (None, _) => index.to_string(),
    }
}

/// Map one nearby-search feature into a point of interest
pub fn point_of_interest(index: usize, feature: &Feature) -> Result<PointOfInterest, String> {
    let position = match &feature.geometry {
        Some(Geometry::Point { coordinates }) => GeoPoint::from_lon_lat(coordinates)
            .ok_or_else(|| format!("Feature {} has an incomplete position", index))?,
        Some(_) => return Err(format!("Feature {} is not a point", index)),
        None => return Err(format!("Feature {} has no geometry", index)),
    };

    let props = feature.props();
    Ok(PointOfInterest {
        id: resolve_id(feature, index),
        position,
        name: prop_str(props, "name").unwrap_or(UNNAMED).to_string(),
        address: resolve_address(props),
    })
}

/// Map a feature collection into a result set, preserving order
pub fn result_set(collection: &FeatureCollection) -> Result<ResultSet, String> {
    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| point_of_interest(index, feature))
        .collect()
}

/// Map a route feature into a route result
///
/// Missing distance or duration default to 0.
pub fn route_result(feature: &Feature) -> Result<RouteResult, String> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or_else(|| "Route has no geometry".to_string())?;

    if matches!(geometry, Geometry::Point { .. }) {
        return Err("Route geometry is not a line".to_string());
    }

    let path = geometry
        .positions()
        .into_iter()
        .map(|position| {
            GeoPoint::from_lon_lat(position)
                .ok_or_else(|| "Route has an incomplete position".to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let props = feature.props();
    Ok(RouteResult {
        geometry: path,
        distance_meters: prop_amount(props, "distance"),
        duration_seconds: prop_amount(props, "duration"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_address_explicit_field_wins() {
        let p = props(json!({
            "address": "10 Main St",
            "tags": {"addr:full": "ignored", "addr:street": "Other"}
        }));
        assert_eq!(resolve_address(&p), "10 Main St");
    }

    #[test]
    fn test_address_composed_from_tags() {
        let p = props(json!({
            "tags": {"addr:housenumber": "10", "addr:street": "Main St"}
        }));
        assert_eq!(resolve_address(&p), "10 Main St");
    }

    #[test]
    fn test_address_full_tag_before_composed() {
        let p = props(json!({
            "tags": {"addr:full": "10 Main St, Hanoi", "addr:street": "Main St"}
        }));
        assert_eq!(resolve_address(&p), "10 Main St, Hanoi");
    }

    #[test]
    fn test_address_street_only_is_trimmed() {
        let p = props(json!({"tags": {"addr:street": "Main St"}}));
        assert_eq!(resolve_address(&p), "Main St");
    }

    #[test]
    fn test_address_from_flattened_tags() {
        let p = props(json!({"name": "Circle K", "addr:housenumber": "5", "addr:street": "Hang Bai"}));
        assert_eq!(resolve_address(&p), "5 Hang Bai");
    }

    #[test]
    fn test_address_empty_when_nothing_known() {
        assert_eq!(resolve_address(&props(json!({"name": "x"}))), "");
        assert_eq!(resolve_address(&props(json!({"address": ""}))), "");
    }

    #[test]
    fn test_collection_preserves_order_and_reverses_coordinates() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [105.85, 21.03]},
                 "properties": {"name": "B", "osm_id": 7, "type": "node"}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [105.84, 21.02]},
                 "properties": {}}
            ]
        }))
        .unwrap();

        let results = result_set(&collection).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "B");
        assert_eq!(results[0].id, "node/7");
        assert_eq!(results[0].position, GeoPoint::new(21.03, 105.85));
        assert_eq!(results[1].name, "Unnamed");
        assert_eq!(results[1].id, "1");
        assert!(!results[1].has_address());
    }

    #[test]
    fn test_empty_and_missing_features() {
        let collection: FeatureCollection =
            serde_json::from_value(json!({"type": "FeatureCollection", "features": []})).unwrap();
        assert!(result_set(&collection).unwrap().is_empty());

        let collection: FeatureCollection = serde_json::from_value(json!({})).unwrap();
        assert!(result_set(&collection).unwrap().is_empty());
    }

    #[test]
    fn test_feature_without_geometry_is_an_error() {
        let collection: FeatureCollection = serde_json::from_value(json!({
            "features": [{"type": "Feature", "properties": {"name": "x"}}]
        }))
        .unwrap();
        assert!(result_set(&collection).is_err());
    }

    #[test]
    fn test_route_result() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[105.84, 21.02], [105.85, 21.03]]},
            "properties": {"distance": 2345.6, "duration": 930}
        }))
        .unwrap();

        let route = route_result(&feature).unwrap();
        assert_eq!(
            route.geometry,
            vec![GeoPoint::new(21.02, 105.84), GeoPoint::new(21.03, 105.85)]
        );
        assert_eq!(route.distance_meters, 2345.6);
        assert_eq!(route.duration_seconds, 930.0);
    }

    #[test]
    fn test_route_defaults_missing_amounts() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[105.84, 21.02]]},
            "properties": {"distance": null}
        }))
        .unwrap();

        let route = route_result(&feature).unwrap();
        assert_eq!(route.distance_meters, 0.0);
        assert_eq!(route.duration_seconds, 0.0);

        let feature: Feature = serde_json::from_value(json!({
            "geometry": {"type": "LineString", "coordinates": []}
        }))
        .unwrap();
        assert_eq!(route_result(&feature).unwrap().distance_meters, 0.0);
    }

    #[test]
    fn test_route_multi_line_is_flattened() {
        let feature: Feature = serde_json::from_value(json!({
            "geometry": {"type": "MultiLineString", "coordinates": [
                [[1.0, 2.0], [3.0, 4.0]],
                [[5.0, 6.0]]
            ]}
        }))
        .unwrap();

        let route = route_result(&feature).unwrap();
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.geometry[2], GeoPoint::new(6.0, 5.0));
    }

    #[test]
    fn test_route_rejects_point_geometry() {
        let feature = Feature::new(Geometry::point(GeoPoint::new(1.0, 2.0)), Map::new());
        assert!(route_result(&feature).is_err());
    }
}
