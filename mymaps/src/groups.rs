//! Feature group enumeration
//!
//! Every My Maps feature is assigned exactly one [`FeatureGroup`]. The
//! groups split into three geometry families (line, polygon, point) with a
//! fixed layer type per group; `OsmBikePath` is the one group sourced from
//! the OSM extract rather than the My Maps document.

use serde::{Deserialize, Serialize};

/// Rendering layer type of a feature group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
    Line,
    Point,
    Polygon,
}

impl LayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayerType::Line => "line",
            LayerType::Point => "point",
            LayerType::Polygon => "polygon",
        }
    }
}

/// Semantic category of a map feature
///
/// Serialized names match the property values the web map filters on, so
/// they keep their historical camelCase spelling (and the space in
/// `"ofney dan"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureGroup {
    // Line groups
    BikePath,
    RecommendedRoad,
    DangerousRoad,
    #[serde(rename = "ofney dan")]
    OfneyDan,
    Planned,
    InProgress,
    Missing,
    DirtRoad,
    DirtPath,
    Bridge,
    Unknown,
    Mistake,

    // Polygon groups
    UnknownPolygon,
    TrainStationIsochrone,
    CoveredArea,
    Hill,
    CalmedTrafficArea,

    // Point groups
    Junction,
    CalmedJunction,
    BlockedPath,
    TrainStation,
    GeneralNote,

    // From the OSM extract, not the My Maps document
    OsmBikePath,
}

/// Groups assigned to line-string features
pub const LINE_GROUPS: &[FeatureGroup] = &[
    FeatureGroup::BikePath,
    FeatureGroup::RecommendedRoad,
    FeatureGroup::DangerousRoad,
    FeatureGroup::OfneyDan,
    FeatureGroup::Planned,
    FeatureGroup::InProgress,
    FeatureGroup::Missing,
    FeatureGroup::DirtRoad,
    FeatureGroup::DirtPath,
    FeatureGroup::Bridge,
    FeatureGroup::Unknown,
    FeatureGroup::Mistake,
];

/// Groups assigned to polygon features
pub const POLYGON_GROUPS: &[FeatureGroup] = &[
    FeatureGroup::UnknownPolygon,
    FeatureGroup::TrainStationIsochrone,
    FeatureGroup::CoveredArea,
    FeatureGroup::Hill,
    FeatureGroup::CalmedTrafficArea,
];

/// Groups assigned to point features
pub const POINT_GROUPS: &[FeatureGroup] = &[
    FeatureGroup::Junction,
    FeatureGroup::CalmedJunction,
    FeatureGroup::BlockedPath,
    FeatureGroup::TrainStation,
    FeatureGroup::GeneralNote,
];

/// Every group the classifier can assign to a My Maps feature
pub const MY_MAPS_GROUPS: &[FeatureGroup] = &[
    FeatureGroup::BikePath,
    FeatureGroup::RecommendedRoad,
    FeatureGroup::DangerousRoad,
    FeatureGroup::OfneyDan,
    FeatureGroup::Planned,
    FeatureGroup::InProgress,
    FeatureGroup::Missing,
    FeatureGroup::DirtRoad,
    FeatureGroup::DirtPath,
    FeatureGroup::Bridge,
    FeatureGroup::Unknown,
    FeatureGroup::Mistake,
    FeatureGroup::UnknownPolygon,
    FeatureGroup::TrainStationIsochrone,
    FeatureGroup::CoveredArea,
    FeatureGroup::Hill,
    FeatureGroup::CalmedTrafficArea,
    FeatureGroup::Junction,
    FeatureGroup::CalmedJunction,
    FeatureGroup::BlockedPath,
    FeatureGroup::TrainStation,
    FeatureGroup::GeneralNote,
];

impl FeatureGroup {
    /// Layer type of this group. Fixed per group, never recomputed from a
    /// feature's geometry.
    pub fn layer_type(&self) -> LayerType {
        if POINT_GROUPS.contains(self) {
            LayerType::Point
        } else if POLYGON_GROUPS.contains(self) {
            LayerType::Polygon
        } else {
            LayerType::Line
        }
    }

    /// Serialized name, as stored in the `featureGroup` property
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureGroup::BikePath => "bikePath",
            FeatureGroup::RecommendedRoad => "recommendedRoad",
            FeatureGroup::DangerousRoad => "dangerousRoad",
            FeatureGroup::OfneyDan => "ofney dan",
            FeatureGroup::Planned => "planned",
            FeatureGroup::InProgress => "inProgress",
            FeatureGroup::Missing => "missing",
            FeatureGroup::DirtRoad => "dirtRoad",
            FeatureGroup::DirtPath => "dirtPath",
            FeatureGroup::Bridge => "bridge",
            FeatureGroup::Unknown => "unknown",
            FeatureGroup::Mistake => "mistake",
            FeatureGroup::UnknownPolygon => "unknownPolygon",
            FeatureGroup::TrainStationIsochrone => "trainStationIsochrone",
            FeatureGroup::CoveredArea => "coveredArea",
            FeatureGroup::Hill => "hill",
            FeatureGroup::CalmedTrafficArea => "calmedTrafficArea",
            FeatureGroup::Junction => "junction",
            FeatureGroup::CalmedJunction => "calmedJunction",
            FeatureGroup::BlockedPath => "blockedPath",
            FeatureGroup::TrainStation => "trainStation",
            FeatureGroup::GeneralNote => "generalNote",
            FeatureGroup::OsmBikePath => "osmBikePath",
        }
    }
}

impl std::fmt::Display for FeatureGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
