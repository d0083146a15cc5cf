//! QWeather wire types

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::WeatherError;

/// Status code QWeather puts in the body of a successful response
pub(crate) const SUCCESS_CODE: &str = "200";

/// The three data kinds the hub refreshes independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateFeature {
    /// Real-time observation (`/now`)
    Now,
    /// 24 hour forecast (`/24h`)
    Hourly,
    /// 7 day forecast (`/7d`)
    Daily,
}

impl UpdateFeature {
    /// All features in initial refresh order
    pub const ALL: [Self; 3] = [Self::Now, Self::Hourly, Self::Daily];

    /// Endpoint path relative to the API base URL
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::Hourly => "24h",
            Self::Daily => "7d",
        }
    }

    /// Name of the response member carrying the payload
    #[must_use]
    pub const fn member(&self) -> &'static str {
        match self {
            Self::Now => "now",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for UpdateFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.member())
    }
}

/// Response envelope shared by all weather endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiEnvelope {
    /// Provider status code, `"200"` on success
    #[serde(default)]
    pub code: Option<String>,
    /// Last update time of the provider's data
    #[serde(default)]
    pub update_time: Option<String>,
    /// Endpoint specific members (`now`, `hourly`, `daily`, `refer`, ...)
    #[serde(flatten)]
    pub members: Map<String, Value>,
}

impl ApiEnvelope {
    /// Check the status code and take the member for `feature`
    pub fn into_member(mut self, feature: UpdateFeature) -> Result<Value, WeatherError> {
        if let Some(code) = self.code.as_deref() {
            if code != SUCCESS_CODE {
                return Err(WeatherError::ApiStatus(code.to_string()));
            }
        }

        self.members.remove(feature.member()).ok_or_else(|| {
            WeatherError::ParseError(format!(
                "No `{}` member in {feature} response",
                feature.member()
            ))
        })
    }
}
