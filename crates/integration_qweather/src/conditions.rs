//! Condition label classification
//!
//! QWeather reports conditions as Chinese free text (`晴`, `雷阵雨`, ...). The
//! table below buckets every label the provider documents into a
//! [`ConditionCategory`]. Matching is exact and case-sensitive.

use std::{collections::HashMap, sync::LazyLock};

use domain::{Condition, ConditionCategory};
use tracing::debug;

/// Known vendor labels per category, probed in declaration order
const CONDITION_TABLE: &[(ConditionCategory, &[&str])] = &[
    (ConditionCategory::Sunny, &["晴"]),
    (ConditionCategory::Cloudy, &["多云"]),
    (ConditionCategory::PartlyCloudy, &["少云", "晴间多云", "阴"]),
    (ConditionCategory::Windy, &["有风", "微风", "和风", "清风"]),
    (
        ConditionCategory::WindyVariant,
        &[
            "强风", "劲风", "疾风", "大风", "烈风", "飓风", "龙卷风", "热带风暴", "狂暴风", "风暴",
        ],
    ),
    (
        ConditionCategory::Rainy,
        &[
            "雨",
            "毛毛雨",
            "细雨",
            "小雨",
            "小到中雨",
            "中雨",
            "中到大雨",
            "大雨",
            "大到暴雨",
            "阵雨",
            "极端降雨",
            "冻雨",
        ],
    ),
    (
        ConditionCategory::Pouring,
        &[
            "暴雨",
            "暴雨到大暴雨",
            "大暴雨",
            "大暴雨到特大暴雨",
            "特大暴雨",
            "强阵雨",
        ],
    ),
    (ConditionCategory::LightningRainy, &["雷阵雨", "强雷阵雨"]),
    (
        ConditionCategory::Fog,
        &[
            "雾", "薄雾", "霾", "浓雾", "强浓雾", "中度霾", "重度霾", "严重霾", "大雾", "特强浓雾",
        ],
    ),
    (ConditionCategory::Hail, &["雷阵雨伴有冰雹"]),
    (
        ConditionCategory::Snowy,
        &[
            "小雪", "小到中雪", "中雪", "中到大雪", "大雪", "大到暴雪", "暴雪", "阵雪",
        ],
    ),
    (ConditionCategory::SnowyRainy, &["雨夹雪", "雨雪天气", "阵雨夹雪"]),
    (
        ConditionCategory::Exceptional,
        &["扬沙", "浮尘", "沙尘暴", "强沙尘暴", "未知"],
    ),
];

/// Label → category lookup, built once from [`CONDITION_TABLE`]
///
/// Earlier categories win if a label were ever listed twice.
static CONDITION_LOOKUP: LazyLock<HashMap<&'static str, ConditionCategory>> =
    LazyLock::new(|| {
        let mut lookup = HashMap::new();
        for (category, labels) in CONDITION_TABLE {
            for label in *labels {
                lookup.entry(*label).or_insert(*category);
            }
        }
        lookup
    });

/// Classify a vendor condition label
///
/// Returns the owning category, or [`Condition::Unrecognized`] carrying the
/// label unchanged when no category lists it.
#[must_use]
pub fn classify(raw: &str) -> Condition {
    CONDITION_LOOKUP.get(raw).map_or_else(
        || {
            debug!(label = %raw, "Unrecognized condition label, passing through");
            Condition::Unrecognized(raw.to_string())
        },
        |category| Condition::Category(*category),
    )
}

/// Vendor labels that classify to `category`
#[must_use]
pub fn labels_for(category: ConditionCategory) -> &'static [&'static str] {
    CONDITION_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(&[], |(_, labels)| *labels)
}

/// Every known label with its category, in table order
pub fn known_labels() -> impl Iterator<Item = (&'static str, ConditionCategory)> {
    CONDITION_TABLE
        .iter()
        .flat_map(|(category, labels)| labels.iter().map(move |label| (*label, *category)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn thunder_shower_is_lightning_rainy() {
        assert_eq!(
            classify("雷阵雨"),
            Condition::Category(ConditionCategory::LightningRainy)
        );
        assert_eq!(classify("雷阵雨"), "lightning-rainy");
    }

    #[test]
    fn clear_and_cloudy() {
        assert_eq!(classify("晴"), "sunny");
        assert_eq!(classify("多云"), "cloudy");
        assert_eq!(classify("阴"), "partlycloudy");
    }

    #[test]
    fn hail_is_not_confused_with_thunder_shower() {
        assert_eq!(
            classify("雷阵雨伴有冰雹").category(),
            Some(ConditionCategory::Hail)
        );
    }

    #[test]
    fn storms_are_windy_variant() {
        for label in ["飓风", "龙卷风", "热带风暴", "狂暴风", "风暴"] {
            assert_eq!(
                classify(label).category(),
                Some(ConditionCategory::WindyVariant),
                "{label}"
            );
        }
    }

    #[test]
    fn unknown_label_passes_through() {
        let condition = classify("冰粒");
        assert!(condition.is_unrecognized());
        assert_eq!(condition.as_str(), "冰粒");
    }

    #[test]
    fn matching_is_exact() {
        assert!(classify(" 晴").is_unrecognized());
        assert!(classify("晴 ").is_unrecognized());
        assert!(classify("Sunny").is_unrecognized());
        assert!(classify("").is_unrecognized());
    }

    #[test]
    fn every_category_has_labels() {
        for category in ConditionCategory::ALL {
            assert!(!labels_for(category).is_empty(), "{category}");
        }
    }

    #[test]
    fn label_sets_are_disjoint() {
        let mut seen = HashSet::new();
        for (label, _) in known_labels() {
            assert!(seen.insert(label), "duplicate label {label}");
        }
    }

    #[test]
    fn every_known_label_classifies_to_its_owner() {
        for (label, category) in known_labels() {
            assert_eq!(classify(label).category(), Some(category), "{label}");
        }
    }
}
