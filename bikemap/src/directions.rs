//! Directions lookup against the Mapbox API
//!
//! The route builder only sees the [`Directions`] trait; the production
//! implementation calls the Mapbox Directions v5 cycling profile and wraps
//! the first returned route into a GeoJSON feature.

use geo::Point;
use geojson::{Feature, Geometry, Value};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

const MAPBOX_DIRECTIONS_BASE: &str = "https://api.mapbox.com/directions/v5/mapbox/cycling";

/// Errors raised by a directions lookup
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// Network failure or non-2xx response
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Body that is not the expected response shape
    #[error("malformed directions response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Well-formed response with an empty route list
    #[error("directions response contains no routes")]
    NoRoute,

    /// Route geometry of an unexpected type
    #[error("directions route geometry is not a line string: {0}")]
    NotALineString(&'static str),
}

/// Asynchronous directions collaborator of the route builder
pub trait Directions {
    /// Best cycling route between two points, as a GeoJSON line-string
    /// feature carrying `distance` and `duration` properties.
    fn fetch_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> impl std::future::Future<Output = Result<Feature, DirectionsError>> + Send;
}

/// Mapbox Directions v5 client (cycling profile)
#[derive(Debug, Clone)]
pub struct MapboxDirections {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl MapboxDirections {
    pub fn new(token: String) -> Self {
        Self::with_base_url(MAPBOX_DIRECTIONS_BASE.to_string(), token)
    }

    /// Point the client at a different endpoint (proxies, test servers)
    pub fn with_base_url(base_url: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            token,
        }
    }
}

impl Directions for MapboxDirections {
    async fn fetch_route(
        &self,
        origin: Point,
        destination: Point,
    ) -> Result<Feature, DirectionsError> {
        let url = format!(
            "{}/{},{};{},{}",
            self.base_url,
            origin.x(),
            origin.y(),
            destination.x(),
            destination.y()
        );

        let body = self
            .client
            .get(&url)
            .query(&[("geometries", "geojson"), ("access_token", &self.token)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        route_feature(&body)
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    geometry: Geometry,

    #[serde(default)]
    distance: f64,

    #[serde(default)]
    duration: f64,
}

/// Wraps the first route of a directions response body into a feature
fn route_feature(body: &str) -> Result<Feature, DirectionsError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or(DirectionsError::NoRoute)?;

    if !matches!(route.geometry.value, Value::LineString(_)) {
        return Err(DirectionsError::NotALineString(
            route.geometry.value.type_name(),
        ));
    }

    let mut properties = geojson::JsonObject::new();
    properties.insert("distance".to_string(), json!(route.distance));
    properties.insert("duration".to_string(), json!(route.duration));

    Ok(Feature {
        bbox: None,
        geometry: Some(route.geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "routes": [
            {
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[34.78, 32.08], [34.785, 32.085], [34.79, 32.09]]
                },
                "distance": 1532.4,
                "duration": 311.9
            },
            {
                "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] },
                "distance": 9999.0,
                "duration": 9999.0
            }
        ],
        "waypoints": [],
        "code": "Ok"
    }"#;

    #[test]
    fn test_first_route_is_used() {
        let feature = route_feature(RESPONSE).unwrap();

        let Some(Geometry {
            value: Value::LineString(coordinates),
            ..
        }) = feature.geometry
        else {
            panic!("expected a line string");
        };
        assert_eq!(coordinates.len(), 3);
        assert_eq!(coordinates[2], vec![34.79, 32.09]);

        let properties = feature.properties.unwrap();
        assert_eq!(properties["distance"], 1532.4);
        assert_eq!(properties["duration"], 311.9);
    }

    #[test]
    fn test_empty_route_list() {
        let result = route_feature(r#"{ "routes": [], "code": "NoRoute" }"#);
        assert!(matches!(result, Err(DirectionsError::NoRoute)));
    }

    #[test]
    fn test_missing_routes_key() {
        let result = route_feature(r#"{ "code": "InvalidInput" }"#);
        assert!(matches!(result, Err(DirectionsError::NoRoute)));
    }

    #[test]
    fn test_non_line_string_geometry() {
        let result = route_feature(
            r#"{ "routes": [ { "geometry": { "type": "Point", "coordinates": [34.78, 32.08] } } ] }"#,
        );
        assert!(matches!(
            result,
            Err(DirectionsError::NotALineString("Point"))
        ));
    }

    #[test]
    fn test_garbage_body() {
        let result = route_feature("<!DOCTYPE html>");
        assert!(matches!(result, Err(DirectionsError::Malformed(_))));
    }
}
