//! OSRM routing client

use crate::error::{Error, Result};
use crate::geo::GeoPoint;
use crate::query::wire::{Feature, Geometry};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// OSRM route service response
#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// One route alternative (requested with `geometries=geojson`)
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: Option<Geometry>,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
}

impl OsrmRoute {
    /// Feature carrying the route line and its distance and duration
    pub fn to_feature(&self) -> Feature {
        let mut properties = Map::new();
        properties.insert("distance".to_string(), self.distance.into());
        properties.insert("duration".to_string(), self.duration.into());

        Feature {
            kind: "Feature".to_string(),
            id: None,
            geometry: self.geometry.clone(),
            properties: Some(properties),
        }
    }
}

impl OsrmResponse {
    /// The first route, or `Error::Upstream("No route found")`
    pub fn first_route(&self) -> Result<&OsrmRoute> {
        self.routes
            .first()
            .ok_or_else(|| Error::Upstream("No route found".to_string()))
    }
}

/// Driving route URL for the server at `base`
pub fn route_url(base: &str, start: GeoPoint, end: GeoPoint) -> String {
    format!(
        "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
        base.trim_end_matches('/'),
        start.lng,
        start.lat,
        end.lng,
        end.lat
    )
}

/// Query the OSRM server at `base`
pub async fn fetch_route(
    client: &reqwest::Client,
    base: &str,
    timeout: Duration,
    start: GeoPoint,
    end: GeoPoint,
) -> Result<OsrmResponse> {
    let url = route_url(base, start, end);
    debug!("OSRM request {}", url);

    let response = client
        .get(&url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| Error::Upstream(format!("Routing request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(Error::Upstream(format!(
            "Routing request failed: status {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Routing request failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_url_uses_lon_lat_order() {
        let url = route_url(
            "http://router.project-osrm.org/",
            GeoPoint::new(21.5, 105.25),
            GeoPoint::new(21.75, 105.5),
        );
        assert_eq!(
            url,
            "http://router.project-osrm.org/route/v1/driving/105.25,21.5;105.5,21.75?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn test_route_feature() {
        let response: OsrmResponse = serde_json::from_value(json!({
            "code": "Ok",
            "routes": [{
                "geometry": {"type": "LineString", "coordinates": [[105.84, 21.02], [105.85, 21.03]]},
                "distance": 2345.6,
                "duration": 930.0
            }]
        }))
        .unwrap();

        let feature = response.first_route().unwrap().to_feature();
        let value = serde_json::to_value(&feature).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["geometry"]["type"], "LineString");
        assert_eq!(value["properties"]["distance"], 2345.6);
        assert_eq!(value["properties"]["duration"], 930.0);
    }

    #[test]
    fn test_missing_amounts_serialize_as_null() {
        let route = OsrmRoute {
            geometry: None,
            distance: None,
            duration: None,
        };
        let value = serde_json::to_value(route.to_feature()).unwrap();
        assert!(value["properties"]["distance"].is_null());
        assert!(value["geometry"].is_null());
    }

    #[test]
    fn test_no_routes() {
        let response: OsrmResponse =
            serde_json::from_value(json!({"code": "NoRoute", "routes": []})).unwrap();
        let err = response.first_route().unwrap_err();
        assert_eq!(err.to_string(), "No route found");
    }
}
