//! Current weather observation

use serde::{Deserialize, Serialize};

use crate::value_objects::Condition;

/// Present weather state at the configured location
///
/// Every attribute is optional: a field the provider omitted stays `None`
/// rather than defaulting to zero or an empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentObservation {
    /// Classified condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Temperature in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Apparent (feels like) temperature in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apparent_temperature: Option<f64>,
    /// Dew point in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    /// Wind direction in degrees (0-360)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_bearing: Option<u16>,
    /// Wind speed in km/h
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_speed: Option<f64>,
    /// Cloud coverage percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_coverage: Option<f64>,
    /// Relative humidity percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    /// Visibility in km
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    /// Pressure in hPa
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ConditionCategory;

    #[test]
    fn default_has_no_attributes() {
        let obs = CurrentObservation::default();
        assert!(obs.condition.is_none());
        assert!(obs.temperature.is_none());
        assert!(obs.visibility.is_none());
    }

    #[test]
    fn missing_fields_are_not_serialized() {
        let obs = CurrentObservation {
            temperature: Some(21.0),
            humidity: Some(60.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json, serde_json::json!({"temperature": 21.0, "humidity": 60.0}));
    }

    #[test]
    fn condition_serializes_as_plain_label() {
        let obs = CurrentObservation {
            condition: Some(Condition::Category(ConditionCategory::PartlyCloudy)),
            ..Default::default()
        };
        let json = serde_json::to_value(&obs).unwrap();
        assert_eq!(json, serde_json::json!({"condition": "partlycloudy"}));

        let raw = CurrentObservation {
            condition: Some(Condition::Unrecognized("冰粒".to_string())),
            ..Default::default()
        };
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json, serde_json::json!({"condition": "冰粒"}));
    }
}
