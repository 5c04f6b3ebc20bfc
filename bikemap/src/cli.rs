//! CLI command definitions and implementation
//!
//! Three commands around the core pipeline:
//! - `fetch`: load + classify both map sources, write grouped GeoJSON
//! - `classify`: offline classification of a local document
//! - `route`: chain directions segments through the route builder

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use geo::Point;
use tracing::info;

use crate::config::Config;
use crate::directions::MapboxDirections;
use crate::export;
use crate::route::RouteBuilder;
use crate::sources::{geojson_passthrough, FileSource, HttpSource, MapFeatureAggregator};

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and classify the map sources, writing one GeoJSON file per
    /// feature group
    Fetch {
        /// Output directory for the grouped GeoJSON files
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Classify a local, already converted GeoJSON document (no network)
    Classify {
        /// Path to the GeoJSON document
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the grouped GeoJSON files
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Build a cycling route through the given stops
    Route {
        /// Stop as lon,lat; repeat in visiting order (at least two)
        #[arg(long = "stop", value_name = "LON,LAT", required = true)]
        stops: Vec<String>,

        /// Output file for the route GeoJSON (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Runs the fetch command
pub async fn cmd_fetch(config: &Config, output: &Path) -> Result<()> {
    let aggregator = MapFeatureAggregator::new(
        HttpSource::new(config.kml_source.clone()),
        FileSource::new(config.osm_extract.clone()),
    );

    let features = aggregator.load().await;

    let summary = export::export_grouped(&features.my_maps, output)?;
    let osm_count = export::export_collection(&features.osm, &output.join("osm.geojson"))?;

    println!("=== Export ===");
    println!("Output: {}", output.display());
    for (group, count) in &summary {
        println!("- {}: {} features", group, count);
    }
    println!("- osm: {} features", osm_count);

    info!(
        groups = summary.len(),
        osm = osm_count,
        "Export complete"
    );
    Ok(())
}

/// Runs the classify command
pub fn cmd_classify(input: &Path, output: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let collection = geojson_passthrough(&raw)?;
    let classified = mymaps::classify_collection(collection)
        .with_context(|| format!("classifying {}", input.display()))?;

    let summary = export::export_grouped(&classified, output)?;

    println!("=== Classification ===");
    for (group, count) in &summary {
        println!("- {}: {} features", group, count);
    }
    Ok(())
}

/// Runs the route command
pub async fn cmd_route(config: &Config, stops: &[String], output: Option<&Path>) -> Result<()> {
    let stops: Vec<Point> = stops
        .iter()
        .map(|raw| parse_stop(raw))
        .collect::<Result<_>>()?;
    if stops.len() < 2 {
        bail!("A route needs at least two stops");
    }

    let directions = MapboxDirections::new(config.mapbox_token.clone());
    let mut route = RouteBuilder::new(
        directions,
        config.route_throttle,
        config.route_min_leg_distance,
    );

    let mut stops = stops.into_iter();
    let first = stops.next().context("A route needs at least two stops")?;
    route.add_stop(first);

    for stop in stops {
        // Stay inside the throttle window so every leg is fetched
        tokio::time::sleep(config.route_throttle).await;
        route.track_center(stop).await;
        if route.has_unresolved_leg() {
            bail!(
                "No route found to {},{} (see log for the fetch failure)",
                stop.x(),
                stop.y()
            );
        }
        route.add_stop(stop);
    }

    let features = route.features();
    match output {
        Some(path) => {
            let count = export::export_collection(&features, path)?;
            println!(
                "Route with {} legs ({} features) written to {}",
                route.past_segments().len(),
                count,
                path.display()
            );
        }
        None => {
            let json = serde_json::to_string_pretty(&features)?;
            println!("{json}");
        }
    }

    Ok(())
}

/// Parses a "lon,lat" stop argument
fn parse_stop(raw: &str) -> Result<Point> {
    let (lon, lat) = raw
        .split_once(',')
        .with_context(|| format!("Invalid stop '{raw}'. Expected lon,lat"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .with_context(|| format!("Invalid longitude in stop '{raw}'"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .with_context(|| format!("Invalid latitude in stop '{raw}'"))?;

    if !(-180.0..=180.0).contains(&lon) {
        bail!("Longitude out of range in stop '{raw}'");
    }
    if !(-90.0..=90.0).contains(&lat) {
        bail!("Latitude out of range in stop '{raw}'");
    }

    Ok(Point::new(lon, lat))
}
