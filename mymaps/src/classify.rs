//! Classification of My Maps features
//!
//! Assigns each KML-derived GeoJSON feature to a [`FeatureGroup`] from
//! heuristic rules over its styling and text attributes. Dispatch is on
//! geometry type first; within a family the rules form a priority chain
//! where the first match wins. The rule tables below mirror the curated
//! source document and are the place to edit when the map curators change
//! a color or status convention.

use std::sync::OnceLock;

use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Value};
use rand::Rng;
use regex::Regex;
use serde_json::json;

use crate::error::ClassifyError;
use crate::groups::FeatureGroup;
use crate::types::{Classification, ClassifiedCollection, ClassifiedFeature, RawProperties};

/// Stroke colors with a fixed line-group meaning
const STROKE_DANGEROUS_ROAD: &str = "#ff5252";
const STROKE_RECOMMENDED_ROAD: &[&str] = &["#0ba9cc", "#4186f0"];
const STROKE_OFNEY_DAN: &str = "#c6a4cf";
const STROKE_PLANNED: &str = "#fad199";
const STROKE_MISSING: &[&str] = &["#f8971b", "#ffdd5e"];
const STROKE_BRIDGE: &str = "#7c3592";
const STROKE_BIKE_PATH: &str = "#3f5ba9";

/// Hebrew status strings of the source table
const STATUS_PLANNED: &str = "תכנון";
const STATUS_IN_PROGRESS: &str = "בביצוע";

/// Hebrew "type" strings of the source table
const KIND_DIRT_ROAD: &str = "דרך עפר";
const KIND_DIRT_PATH: &str = "שביל עפר";

/// A single route known to be mislabeled in the source document
const MISTAKE_NAME: &str = "קו 121";

/// Polygon fill colors with a fixed meaning
const FILL_COVERED_AREA: &str = "#009d57";
const FILL_HILL: &str = "#ee9c96";
const FILL_CALMED_TRAFFIC_AREA: &str = "#93d7e8";

/// Substring marking a transit isochrone polygon ("minutes of riding from")
const ISOCHRONE_NAME_MARKER: &str = "דקות רכיבה מ";

/// Marker images with a fixed point-group meaning
const ICON_JUNCTION: &str =
    "https://www.gstatic.com/mapspro/images/stock/962-wht-diamond-blank.png";
const ICON_CALMED_JUNCTION: &str =
    "https://www.gstatic.com/mapspro/images/stock/1269-poi-hospital-cross.png";
const ICON_BLOCKED_PATH: &str =
    "https://www.gstatic.com/mapspro/images/stock/1145-crisis-explosion.png";
const ICON_TRAIN_STATION: &str =
    "https://www.gstatic.com/mapspro/images/stock/1459-trans-train.png";

/// Names like "קו 42": a numbered line sharing the recommended-road style,
/// drawn as a direction arrow rather than a road of its own
fn direction_arrow_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^קו \d+$").expect("direction arrow pattern"))
}

/// Classifies a single feature.
///
/// Pure and deterministic; reclassifying a classified feature yields the
/// same result. Fails only on a missing geometry or a geometry type
/// outside the point / line-string / polygon families (both indicate
/// corrupt source data).
pub fn classify(feature: &Feature) -> Result<Classification, ClassifyError> {
    let Some(geometry) = &feature.geometry else {
        return Err(ClassifyError::NullGeometry);
    };

    let props = RawProperties::from_feature(feature);

    match &geometry.value {
        Value::LineString(_) => Ok(classify_line(&props)),
        // The converter wraps some polygons in a geometry collection
        Value::Polygon(_) | Value::GeometryCollection(_) => Ok(classify_polygon(&props)),
        Value::Point(_) => Ok(classify_point(&props)),
        other => Err(ClassifyError::UnsupportedGeometry(other.type_name())),
    }
}

fn classify_line(props: &RawProperties) -> Classification {
    let stroke = props.stroke.as_deref();
    let status = props.status.as_deref().map(str::trim);
    let kind = props.kind.as_deref().map(str::trim);

    let (group, highlightable) = if stroke == Some(STROKE_DANGEROUS_ROAD) {
        (FeatureGroup::DangerousRoad, true)
    } else if stroke.is_some_and(|s| STROKE_RECOMMENDED_ROAD.contains(&s)) {
        if direction_arrow_name().is_match(&props.name) {
            // Direction arrow riding on the road style: rendered, but
            // excluded from hit-testing so it never shadows its road
            (FeatureGroup::RecommendedRoad, false)
        } else {
            (FeatureGroup::RecommendedRoad, true)
        }
    } else if stroke == Some(STROKE_OFNEY_DAN) {
        (FeatureGroup::OfneyDan, true)
    } else if stroke == Some(STROKE_PLANNED) || status == Some(STATUS_PLANNED) {
        (FeatureGroup::Planned, true)
    } else if status == Some(STATUS_IN_PROGRESS) {
        (FeatureGroup::InProgress, true)
    } else if stroke.is_some_and(|s| STROKE_MISSING.contains(&s)) {
        (FeatureGroup::Missing, true)
    } else if stroke == Some(STROKE_BRIDGE) {
        (FeatureGroup::Bridge, true)
    } else if kind == Some(KIND_DIRT_ROAD) {
        (FeatureGroup::DirtRoad, true)
    } else if kind == Some(KIND_DIRT_PATH) {
        (FeatureGroup::DirtPath, true)
    } else if stroke == Some(STROKE_BIKE_PATH) {
        (FeatureGroup::BikePath, true)
    } else if props.name.trim() == MISTAKE_NAME {
        (FeatureGroup::Mistake, true)
    } else {
        (FeatureGroup::Unknown, true)
    };

    Classification {
        group,
        highlightable,
    }
}

fn classify_polygon(props: &RawProperties) -> Classification {
    let fill = props.fill.as_deref();

    let group = if props.name.contains(ISOCHRONE_NAME_MARKER) {
        FeatureGroup::TrainStationIsochrone
    } else if fill == Some(FILL_COVERED_AREA) {
        FeatureGroup::CoveredArea
    } else if fill == Some(FILL_HILL) {
        FeatureGroup::Hill
    } else if fill == Some(FILL_CALMED_TRAFFIC_AREA) {
        FeatureGroup::CalmedTrafficArea
    } else {
        FeatureGroup::UnknownPolygon
    };

    Classification {
        group,
        highlightable: true,
    }
}

fn classify_point(props: &RawProperties) -> Classification {
    let group = match props.icon.as_deref() {
        Some(ICON_JUNCTION) => FeatureGroup::Junction,
        Some(ICON_CALMED_JUNCTION) => FeatureGroup::CalmedJunction,
        Some(ICON_BLOCKED_PATH) => FeatureGroup::BlockedPath,
        Some(ICON_TRAIN_STATION) => FeatureGroup::TrainStation,
        _ => FeatureGroup::GeneralNote,
    };

    Classification {
        group,
        highlightable: true,
    }
}

/// Classifies a whole KML-derived collection.
///
/// Every feature gains inline `featureGroup`, `layerType` and
/// `highlightable` properties plus a random numeric id assigned once per
/// load. A feature with a null geometry aborts the whole batch: the
/// exporter never produces one, so a partial result would hide upstream
/// corruption.
pub fn classify_collection(
    collection: FeatureCollection,
) -> Result<ClassifiedCollection, ClassifyError> {
    if collection.features.iter().any(|f| f.geometry.is_none()) {
        return Err(ClassifyError::NullGeometry);
    }

    let mut features = Vec::with_capacity(collection.features.len());
    for feature in collection.features {
        let classification = classify(&feature)?;
        features.push(ClassifiedFeature {
            group: classification.group,
            highlightable: classification.highlightable,
            feature: enrich(feature, classification),
        });
    }

    Ok(ClassifiedCollection { features })
}

/// Stamps the classification into the feature's property bag and assigns
/// its id
fn enrich(mut feature: Feature, classification: Classification) -> Feature {
    let properties = feature.properties.get_or_insert_with(Default::default);
    properties.insert(
        "featureGroup".to_string(),
        json!(classification.group.as_str()),
    );
    properties.insert(
        "layerType".to_string(),
        json!(classification.group.layer_type().as_str()),
    );
    properties.insert("highlightable".to_string(), json!(classification.highlightable));

    feature.id = Some(Id::Number(random_feature_id().into()));
    feature
}

/// 18-digit random id, unique per classification run
fn random_feature_id() -> u64 {
    rand::rng().random_range(100_000_000_000_000_000u64..1_000_000_000_000_000_000u64)
}
