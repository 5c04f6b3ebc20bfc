//! # mymaps
//!
//! Classifier for the hand-curated "My Maps" layer of the bicycle route
//! map. The KML document is converted to GeoJSON upstream; this crate
//! assigns each feature a semantic [`FeatureGroup`] (road quality, hazard,
//! terrain, infrastructure) from deterministic rules over its styling and
//! text attributes, and carries the per-group display catalog used by the
//! map legend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mymaps::{classify_collection, FeatureGroup};
//!
//! let collection = geojson.parse()?;
//! let classified = classify_collection(collection)?;
//!
//! for (group, features) in classified.by_group() {
//!     println!("{}: {} features", group, features.features.len());
//! }
//! ```

pub mod catalog;
pub mod classify;
pub mod error;
pub mod groups;
pub mod types;

pub use catalog::{metadata, GroupMetadata, GroupStyle};
pub use classify::{classify, classify_collection};
pub use error::ClassifyError;
pub use groups::{FeatureGroup, LayerType, MY_MAPS_GROUPS};
pub use types::{Classification, ClassifiedCollection, ClassifiedFeature, RawProperties};
