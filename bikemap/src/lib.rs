//! # bikemap
//!
//! Application crate of the bicycle-route map: loads and classifies the
//! map sources (via the `mymaps` crate), builds multi-stop cycling routes
//! against the Mapbox directions API, and exports everything as GeoJSON.
//!
//! ## Usage CLI
//!
//! ```bash
//! # Fetch both sources and write one GeoJSON file per feature group
//! bikemap fetch --output ./out/
//!
//! # Classify a local, already converted document (no network)
//! bikemap classify --input ./mymaps.geojson --output ./out/
//!
//! # Build a route through three stops
//! bikemap route --stop 34.78,32.08 --stop 34.79,32.09 --stop 34.80,32.10
//! ```

pub mod cli;
pub mod config;
pub mod directions;
pub mod export;
pub mod route;
pub mod sources;

pub use config::Config;
pub use directions::{Directions, DirectionsError, MapboxDirections};
pub use route::{RouteBuilder, Segment};
pub use sources::{MapFeatureAggregator, MapFeatures};
