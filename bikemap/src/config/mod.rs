//! Runtime configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Url;

/// Directions fetch window while tracking the map center
pub const DEFAULT_ROUTE_THROTTLE: Duration = Duration::from_millis(250);

/// Minimum distance, in degrees, the center must move from a leg's origin
/// before a directions fetch is worth issuing
pub const DEFAULT_MIN_LEG_DISTANCE: f64 = 0.001;

/// Default location of the pre-converted OSM extract
pub const DEFAULT_OSM_EXTRACT: &str = "data/osm.geojson";

/// Runtime configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Mapbox access token, used for the directions API
    pub mapbox_token: String,

    /// URL serving the converted My Maps document as GeoJSON
    pub kml_source: Url,

    /// Local OSM extract (GeoJSON). A missing file is a recoverable load
    /// failure, not a configuration error.
    pub osm_extract: PathBuf,

    pub route_throttle: Duration,
    pub route_min_leg_distance: f64,
}

impl Config {
    /// Loads the configuration from the environment.
    ///
    /// `MAPBOX_TOKEN` and `KML_SOURCE` are required; their absence is a
    /// startup failure, never retried.
    pub fn from_env() -> Result<Self> {
        let mapbox_token =
            std::env::var("MAPBOX_TOKEN").context("MAPBOX_TOKEN is not set")?;

        let kml_source = std::env::var("KML_SOURCE").context("KML_SOURCE is not set")?;
        let kml_source = Url::parse(&kml_source)
            .with_context(|| format!("KML_SOURCE is not a valid URL: {kml_source}"))?;

        let osm_extract = std::env::var("OSM_EXTRACT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OSM_EXTRACT));

        let route_throttle = std::env::var("ROUTE_THROTTLE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_ROUTE_THROTTLE);

        let route_min_leg_distance = std::env::var("ROUTE_MIN_LEG_DISTANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MIN_LEG_DISTANCE);

        Ok(Self {
            mapbox_token,
            kml_source,
            osm_extract,
            route_throttle,
            route_min_leg_distance,
        })
    }
}
