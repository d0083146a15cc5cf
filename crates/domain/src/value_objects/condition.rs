//! Weather condition vocabulary
//!
//! [`ConditionCategory`] is the closed set of coarse weather states used for
//! icons and display. [`Condition`] is what a classified label turns into: a
//! known category, or the raw label when no category claims it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Coarse weather state
///
/// Wire names follow the condition vocabulary of the home-automation host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditionCategory {
    /// Clear sky
    Sunny,
    /// Cloudy
    Cloudy,
    /// Partly cloudy or overcast
    #[serde(rename = "partlycloudy")]
    PartlyCloudy,
    /// Light to moderate wind
    Windy,
    /// Strong wind up to storms
    WindyVariant,
    /// Rain
    Rainy,
    /// Heavy rain
    Pouring,
    /// Thunder showers
    LightningRainy,
    /// Fog, mist or haze
    Fog,
    /// Hail
    Hail,
    /// Snow
    Snowy,
    /// Sleet
    SnowyRainy,
    /// Sand, dust and unknown phenomena
    Exceptional,
}

impl ConditionCategory {
    /// Every category in declaration order
    pub const ALL: [Self; 13] = [
        Self::Sunny,
        Self::Cloudy,
        Self::PartlyCloudy,
        Self::Windy,
        Self::WindyVariant,
        Self::Rainy,
        Self::Pouring,
        Self::LightningRainy,
        Self::Fog,
        Self::Hail,
        Self::Snowy,
        Self::SnowyRainy,
        Self::Exceptional,
    ];

    /// Wire name of the category
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::PartlyCloudy => "partlycloudy",
            Self::Windy => "windy",
            Self::WindyVariant => "windy-variant",
            Self::Rainy => "rainy",
            Self::Pouring => "pouring",
            Self::LightningRainy => "lightning-rainy",
            Self::Fog => "fog",
            Self::Hail => "hail",
            Self::Snowy => "snowy",
            Self::SnowyRainy => "snowy-rainy",
            Self::Exceptional => "exceptional",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| DomainError::UnknownCategory(s.to_string()))
    }
}

/// Classified weather condition
///
/// Serializes as a bare string either way, so consumers see `"sunny"` for a
/// known category and the provider's own label otherwise.
///
/// Reading the string back is not a faithful round trip: an unrecognized
/// label that happens to equal a category's wire name (`"sunny"`) comes back
/// as that category. Provider labels never collide with wire names, so this
/// only matters for hand-written input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    /// Label mapped onto a known category
    Category(ConditionCategory),
    /// Label no category claims, passed through unchanged
    Unrecognized(String),
}

impl Condition {
    /// The category, if the label was recognized
    #[must_use]
    pub const fn category(&self) -> Option<ConditionCategory> {
        match self {
            Self::Category(category) => Some(*category),
            Self::Unrecognized(_) => None,
        }
    }

    /// Whether the label was passed through unchanged
    #[must_use]
    pub const fn is_unrecognized(&self) -> bool {
        matches!(self, Self::Unrecognized(_))
    }

    /// String form: the category wire name or the raw label
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Category(category) => category.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ConditionCategory> for Condition {
    fn from(category: ConditionCategory) -> Self {
        Self::Category(category)
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        value
            .parse::<ConditionCategory>()
            .map_or(Self::Unrecognized(value), Self::Category)
    }
}

impl From<Condition> for String {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Category(category) => category.as_str().to_string(),
            Condition::Unrecognized(raw) => raw,
        }
    }
}

impl PartialEq<&str> for Condition {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
