//! Forecast records

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::value_objects::Condition;

/// One hour of the hourly forecast
///
/// Sequences keep the provider's chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecastPoint {
    /// Classified condition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Precipitation in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Precipitation probability percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation_probability: Option<f64>,
    /// Temperature in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Dew point in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dew_point: Option<f64>,
    /// Forecast time, in the location's offset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<FixedOffset>>,
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
    /// Pressure in hPa
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

/// Half-day entry of the twice-daily forecast
///
/// Each provider day yields a daytime record followed by a nighttime record.
/// Both carry the same date-scoped values (precipitation, temperature range,
/// humidity, pressure, UV index) but their own condition and wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastPoint {
    /// Classified condition for this half of the day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
    /// Total precipitation of the day in mm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precipitation: Option<f64>,
    /// Maximum temperature of the day in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Minimum temperature of the day in Celsius
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_low: Option<f64>,
    /// Forecast date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
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
    /// Pressure in hPa
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    /// UV index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    /// `true` for the daytime half, `false` for the night
    pub is_daytime: bool,
}

impl DailyForecastPoint {
    /// Create an empty half-day record
    #[must_use]
    pub const fn empty(is_daytime: bool) -> Self {
        Self {
            condition: None,
            precipitation: None,
            temperature: None,
            temperature_low: None,
            date: None,
            wind_bearing: None,
            wind_speed: None,
            cloud_coverage: None,
            humidity: None,
            pressure: None,
            uv_index: None,
            is_daytime,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_daily_point_keeps_discriminator() {
        assert!(DailyForecastPoint::empty(true).is_daytime);
        assert!(!DailyForecastPoint::empty(false).is_daytime);
        assert!(DailyForecastPoint::empty(true).date.is_none());
    }

    #[test]
    fn daily_point_serializes_is_daytime_always() {
        let json = serde_json::to_value(DailyForecastPoint::empty(false)).unwrap();
        assert_eq!(json, serde_json::json!({"is_daytime": false}));
    }

    #[test]
    fn hourly_point_time_round_trips() {
        let time = DateTime::parse_from_rfc3339("2024-01-01T15:00:00+08:00").unwrap();
        let point = HourlyForecastPoint {
            time: Some(time),
            ..Default::default()
        };
        let json = serde_json::to_string(&point).unwrap();
        let back: HourlyForecastPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time, Some(time));
    }
}
