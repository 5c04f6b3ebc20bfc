//! Data types for the mymaps crate

use std::collections::HashMap;

use geojson::{Feature, FeatureCollection};
use serde::Deserialize;
use tracing::warn;

use crate::groups::FeatureGroup;

/// Raw property bag of a My Maps feature, as emitted by the KML converter
///
/// Everything is optional in the source document; `name` and `description`
/// default to empty strings so the classifier never branches on absence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProperties {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Line color, e.g. `#ff5252`
    #[serde(default)]
    pub stroke: Option<String>,

    /// Polygon fill color
    #[serde(default)]
    pub fill: Option<String>,

    #[serde(rename = "stroke-width", default)]
    pub stroke_width: Option<f64>,

    #[serde(rename = "stroke-opacity", default)]
    pub stroke_opacity: Option<f64>,

    /// Hebrew free-text "type" column of the source table
    #[serde(rename = "סוג", default)]
    pub kind: Option<String>,

    /// Hebrew construction status ("תכנון", "בביצוע")
    #[serde(default)]
    pub status: Option<String>,

    /// Marker image URL for point features
    #[serde(default)]
    pub icon: Option<String>,
}

impl RawProperties {
    /// Extracts the typed property view from a GeoJSON feature.
    ///
    /// A property bag that fails to deserialize is degraded to the empty
    /// default (the feature then falls through to the unknown groups).
    pub fn from_feature(feature: &Feature) -> Self {
        let Some(properties) = &feature.properties else {
            return Self::default();
        };
        serde_json::from_value(serde_json::Value::Object(properties.clone())).unwrap_or_else(
            |err| {
                warn!("Malformed feature properties: {err}");
                Self::default()
            },
        )
    }
}

/// Result of classifying a single feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Assigned semantic category
    pub group: FeatureGroup,

    /// Whether the feature participates in hover/tap hit-testing.
    /// Only the direction-arrow rendition of a recommended road opts out.
    pub highlightable: bool,
}

/// A feature with its assigned group and enriched properties
#[derive(Debug, Clone)]
pub struct ClassifiedFeature {
    pub group: FeatureGroup,
    pub highlightable: bool,

    /// The source feature, now carrying inline `featureGroup`, `layerType`
    /// and `highlightable` properties plus a stable numeric id
    pub feature: Feature,
}

/// Classified My Maps features
///
/// Consumers use two structurally equivalent views interchangeably: the
/// flat feature list (each feature tagged inline via its properties) and
/// the per-group map from [`by_group`](Self::by_group).
#[derive(Debug, Clone, Default)]
pub struct ClassifiedCollection {
    pub features: Vec<ClassifiedFeature>,
}

impl ClassifiedCollection {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features grouped per category
    pub fn by_group(&self) -> HashMap<FeatureGroup, FeatureCollection> {
        let mut map: HashMap<FeatureGroup, FeatureCollection> = HashMap::new();
        for classified in &self.features {
            map.entry(classified.group)
                .or_insert_with(|| FeatureCollection {
                    bbox: None,
                    features: Vec::new(),
                    foreign_members: None,
                })
                .features
                .push(classified.feature.clone());
        }
        map
    }

    /// All features as a single flat collection
    pub fn into_collection(self) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: self.features.into_iter().map(|c| c.feature).collect(),
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn feature_with_properties(value: serde_json::Value) -> Feature {
        Feature {
            bbox: None,
            geometry: None,
            id: None,
            properties: match value {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            },
            foreign_members: None,
        }
    }

    #[test]
    fn test_raw_properties_renamed_fields() {
        let feature = feature_with_properties(json!({
            "name": "רחוב הירקון",
            "stroke": "#0ba9cc",
            "stroke-width": 2.35,
            "stroke-opacity": 1.0,
            "סוג": "דרך עפר",
        }));

        let props = RawProperties::from_feature(&feature);
        assert_eq!(props.name, "רחוב הירקון");
        assert_eq!(props.stroke.as_deref(), Some("#0ba9cc"));
        assert_eq!(props.stroke_width, Some(2.35));
        assert_eq!(props.kind.as_deref(), Some("דרך עפר"));
        assert!(props.status.is_none());
    }

    #[test]
    fn test_raw_properties_missing_bag_defaults() {
        let feature = feature_with_properties(json!(null));
        let props = RawProperties::from_feature(&feature);
        assert_eq!(props.name, "");
        assert!(props.stroke.is_none());
    }
}
