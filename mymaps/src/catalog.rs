//! Display metadata per feature group
//!
//! Pure lookup table used by the legend and layer toggles. Coverage is
//! enforced by exhaustive matching; adding a [`FeatureGroup`] variant
//! without a catalog entry is a compile error.

use crate::groups::{FeatureGroup, LayerType};

/// Legend style of a feature group
///
/// The `Raw*` variants render from the feature's own stroke/fill/icon
/// properties instead of a fixed group style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GroupStyle {
    Line { color: &'static str, width: f64 },
    Polygon { fill: &'static str, opacity: f64 },
    Icon { color: &'static str },
    RawLine,
    RawPolygon,
    RawIcon,
}

/// Display metadata of a feature group
#[derive(Debug, Clone, Copy)]
pub struct GroupMetadata {
    pub group: FeatureGroup,
    pub layer_type: LayerType,

    /// Display name for a single feature
    pub singular: &'static str,

    /// Display name for the layer toggle
    pub plural: &'static str,

    /// Optional blurb shown next to the toggle
    pub description: Option<&'static str>,

    pub style: GroupStyle,
}

fn line(color: &'static str, width: f64) -> GroupStyle {
    GroupStyle::Line { color, width }
}

fn polygon(fill: &'static str, opacity: f64) -> GroupStyle {
    GroupStyle::Polygon { fill, opacity }
}

/// Catalog entry for a group
pub fn metadata(group: FeatureGroup) -> GroupMetadata {
    let (singular, plural, description, style) = match group {
        FeatureGroup::OsmBikePath => (
            "שביל אופניים (OSM)",
            "שבילי אופניים (OSM)",
            Some("בלי הערות אבל יותר מעודכן"),
            line("#3f5ba9", 4.0),
        ),
        FeatureGroup::BikePath => (
            "שביל אופניים",
            "שבילי אופניים (מפה ציבורית)",
            Some("עם הערות אבל פחות מעודכן"),
            line("#3f5ba9", 4.0),
        ),
        FeatureGroup::RecommendedRoad => (
            "כביש סביר",
            "כבישים סבירים",
            Some("כבישים שלא סיוט לרכוב עליהם"),
            line("#0ba9cc", 2.35),
        ),
        FeatureGroup::DangerousRoad => (
            "כביש מסוכן",
            "כבישים מסוכנים",
            None,
            line("#ff5252", 1.75),
        ),
        FeatureGroup::OfneyDan => (
            "אופנידן",
            "אופנידן",
            Some("פרוייקט שאמור לקשר את תל אביב לשאר ערי גוש דן"),
            line("#c6a4cf", 7.0),
        ),
        FeatureGroup::Planned => (
            "שביל מתוכנן",
            "שבילים מתוכננים",
            None,
            line("#fad199", 3.1),
        ),
        FeatureGroup::InProgress => (
            "שביל בביצוע",
            "שבילים בביצוע",
            None,
            line("#f8971b", 2.9),
        ),
        FeatureGroup::Missing => ("שביל חסר", "שבילים חסרים", None, line("#f8971b", 4.0)),
        FeatureGroup::DirtRoad => (
            "דרך עפר",
            "דרכי עפר",
            Some("לא מומלץ לאופני כביש או עיר"),
            line("#009d57", 2.9),
        ),
        FeatureGroup::DirtPath => (
            "שביל עפר",
            "שבילי עפר",
            Some("לא מומלץ לאופני כביש"),
            line("#62af44", 2.1),
        ),
        FeatureGroup::Bridge => ("גשר", "גשרים", None, line("#7c3592", 3.7)),
        FeatureGroup::Unknown => ("???", "???", None, GroupStyle::RawLine),
        FeatureGroup::Mistake => ("טעות", "טעויות", None, GroupStyle::RawLine),
        FeatureGroup::UnknownPolygon => {
            ("שטח כלשהו", "שטחים כלשהם", None, GroupStyle::RawPolygon)
        }
        FeatureGroup::TrainStationIsochrone => (
            "איזוכרון תחנת רכבת",
            "איזוכרוני תחנת רכבת",
            None,
            polygon("#f8971b", 0.2),
        ),
        FeatureGroup::CoveredArea => (
            "שטח מכוסה",
            "שטחים מכוסים",
            None,
            polygon("#009d57", 0.8),
        ),
        FeatureGroup::Hill => ("גבעה", "גבעות", None, polygon("#ee9c96", 0.5)),
        FeatureGroup::CalmedTrafficArea => (
            "איזור מיתון תנועה",
            "איזורי מיתון תנועה",
            Some("המהירות המותרת למכוניות היא עד 30 קמ״ש"),
            polygon("#93d7e8", 0.5),
        ),
        FeatureGroup::Junction => ("צומת", "צמתים", None, GroupStyle::Icon { color: "red" }),
        FeatureGroup::CalmedJunction => (
            "צומת עם מיתון תנועה",
            "צמתים עם מיתון תנועה",
            None,
            GroupStyle::Icon { color: "green" },
        ),
        FeatureGroup::BlockedPath => (
            "דרך חסומה",
            "דרכים חסומות",
            None,
            GroupStyle::Icon { color: "green" },
        ),
        FeatureGroup::TrainStation => (
            "תחנת רכבת",
            "תחנות רכבת",
            None,
            GroupStyle::Icon { color: "blue" },
        ),
        FeatureGroup::GeneralNote => ("הערה כללית", "הערות כלליות", None, GroupStyle::RawIcon),
    };

    GroupMetadata {
        group,
        layer_type: group.layer_type(),
        singular,
        plural,
        description,
        style,
    }
}
