//! Weather normalizer
//!
//! Maps raw QWeather payloads onto the canonical records in `domain`. Every
//! canonical attribute is looked up under a configured source field name:
//! present fields are copied (the condition through [`classify`]), absent
//! fields stay `None`. Nothing here fails on a missing field; only a payload
//! with the wrong top-level shape is rejected.
//!
//! QWeather encodes numbers as JSON strings (`"temp": "21"`), so numeric
//! attributes accept either strings or numbers.

use chrono::{DateTime, FixedOffset, NaiveDate};
use domain::{Condition, CurrentObservation, DailyForecastPoint, HourlyForecastPoint};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{conditions::classify, error::NormalizeError};

/// Source field names for [`CurrentObservation`]
#[derive(Debug, Clone, Copy)]
pub struct CurrentFields {
    pub condition: &'static str,
    pub temperature: &'static str,
    pub apparent_temperature: &'static str,
    pub dew_point: &'static str,
    pub wind_bearing: &'static str,
    pub wind_speed: &'static str,
    pub cloud_coverage: &'static str,
    pub humidity: &'static str,
    pub visibility: &'static str,
    pub pressure: &'static str,
}

/// Source field names for [`HourlyForecastPoint`]
#[derive(Debug, Clone, Copy)]
pub struct HourlyFields {
    pub condition: &'static str,
    pub precipitation: &'static str,
    pub precipitation_probability: &'static str,
    pub temperature: &'static str,
    pub dew_point: &'static str,
    pub time: &'static str,
    pub wind_bearing: &'static str,
    pub wind_speed: &'static str,
    pub cloud_coverage: &'static str,
    pub humidity: &'static str,
    pub pressure: &'static str,
}

/// Source field names for one half of a [`DailyForecastPoint`] pair
#[derive(Debug, Clone, Copy)]
pub struct DailyFields {
    pub condition: &'static str,
    pub precipitation: &'static str,
    pub temperature: &'static str,
    pub temperature_low: &'static str,
    pub date: &'static str,
    pub wind_bearing: &'static str,
    pub wind_speed: &'static str,
    pub cloud_coverage: &'static str,
    pub humidity: &'static str,
    pub pressure: &'static str,
    pub uv_index: &'static str,
    pub is_daytime: bool,
}

/// Mapping for the `now` member of `/now`
pub const NOW_FIELDS: CurrentFields = CurrentFields {
    condition: "text",
    temperature: "temp",
    apparent_temperature: "feelsLike",
    dew_point: "dew",
    wind_bearing: "wind360",
    wind_speed: "windSpeed",
    cloud_coverage: "cloud",
    humidity: "humidity",
    visibility: "vis",
    pressure: "pressure",
};

/// Mapping for elements of the `hourly` member of `/24h`
pub const HOURLY_FIELDS: HourlyFields = HourlyFields {
    condition: "text",
    precipitation: "precip",
    precipitation_probability: "pop",
    temperature: "temp",
    dew_point: "dew",
    time: "fxTime",
    wind_bearing: "wind360",
    wind_speed: "windSpeed",
    cloud_coverage: "cloud",
    humidity: "humidity",
    pressure: "pressure",
};

/// Daytime mapping for elements of the `daily` member of `/7d`
pub const DAILY_DAY_FIELDS: DailyFields = DailyFields {
    condition: "textDay",
    precipitation: "precip",
    temperature: "tempMax",
    temperature_low: "tempMin",
    date: "fxDate",
    wind_bearing: "wind360Day",
    wind_speed: "windSpeedDay",
    cloud_coverage: "cloud",
    humidity: "humidity",
    pressure: "pressure",
    uv_index: "uvIndex",
    is_daytime: true,
};

/// Nighttime mapping; shares the date-scoped fields with the day mapping
pub const DAILY_NIGHT_FIELDS: DailyFields = DailyFields {
    condition: "textNight",
    wind_bearing: "wind360Night",
    wind_speed: "windSpeedNight",
    is_daytime: false,
    ..DAILY_DAY_FIELDS
};

/// Normalize the `now` member of a `/now` response
///
/// # Errors
///
/// Returns [`NormalizeError::UnexpectedShape`] if `raw` is not an object.
pub fn normalize_current(raw: &Value) -> Result<CurrentObservation, NormalizeError> {
    let obj = raw.as_object().ok_or(NormalizeError::UnexpectedShape {
        expected: "an object",
        found: json_type(raw),
    })?;
    Ok(current_from(&Fields(obj), &NOW_FIELDS))
}

/// Normalize the `hourly` member of a `/24h` response
///
/// Output order and length match the input. An empty array yields an empty
/// vector.
///
/// # Errors
///
/// Returns an error if `raw` is not an array or one of its elements is not an
/// object.
pub fn normalize_hourly(raw: &Value) -> Result<Vec<HourlyForecastPoint>, NormalizeError> {
    objects(raw)?
        .map(|item| item.map(|obj| hourly_from(&Fields(obj), &HOURLY_FIELDS)))
        .collect()
}

/// Normalize the `daily` member of a `/7d` response into half-day records
///
/// Each source day produces its daytime record immediately followed by its
/// nighttime record, so the output is always twice as long as the input.
///
/// # Errors
///
/// Returns an error if `raw` is not an array or one of its elements is not an
/// object.
pub fn normalize_daily(raw: &Value) -> Result<Vec<DailyForecastPoint>, NormalizeError> {
    let items = objects(raw)?;
    let mut points = Vec::with_capacity(items.len() * 2);
    for item in items {
        let fields = Fields(item?);
        points.push(daily_from(&fields, &DAILY_DAY_FIELDS));
        points.push(daily_from(&fields, &DAILY_NIGHT_FIELDS));
    }
    Ok(points)
}

fn current_from(f: &Fields<'_>, map: &CurrentFields) -> CurrentObservation {
    CurrentObservation {
        condition: f.condition(map.condition),
        temperature: f.number(map.temperature),
        apparent_temperature: f.number(map.apparent_temperature),
        dew_point: f.number(map.dew_point),
        wind_bearing: f.bearing(map.wind_bearing),
        wind_speed: f.number(map.wind_speed),
        cloud_coverage: f.number(map.cloud_coverage),
        humidity: f.number(map.humidity),
        visibility: f.number(map.visibility),
        pressure: f.number(map.pressure),
    }
}

fn hourly_from(f: &Fields<'_>, map: &HourlyFields) -> HourlyForecastPoint {
    HourlyForecastPoint {
        condition: f.condition(map.condition),
        precipitation: f.number(map.precipitation),
        precipitation_probability: f.number(map.precipitation_probability),
        temperature: f.number(map.temperature),
        dew_point: f.number(map.dew_point),
        time: f.time(map.time),
        wind_bearing: f.bearing(map.wind_bearing),
        wind_speed: f.number(map.wind_speed),
        cloud_coverage: f.number(map.cloud_coverage),
        humidity: f.number(map.humidity),
        pressure: f.number(map.pressure),
    }
}

fn daily_from(f: &Fields<'_>, map: &DailyFields) -> DailyForecastPoint {
    DailyForecastPoint {
        condition: f.condition(map.condition),
        precipitation: f.number(map.precipitation),
        temperature: f.number(map.temperature),
        temperature_low: f.number(map.temperature_low),
        date: f.date(map.date),
        wind_bearing: f.bearing(map.wind_bearing),
        wind_speed: f.number(map.wind_speed),
        cloud_coverage: f.number(map.cloud_coverage),
        humidity: f.number(map.humidity),
        pressure: f.number(map.pressure),
        uv_index: f.number(map.uv_index),
        is_daytime: map.is_daytime,
    }
}

/// Iterate the elements of a forecast array as objects
fn objects(
    raw: &Value,
) -> Result<impl ExactSizeIterator<Item = Result<&Map<String, Value>, NormalizeError>>, NormalizeError>
{
    let items = raw.as_array().ok_or(NormalizeError::UnexpectedShape {
        expected: "an array",
        found: json_type(raw),
    })?;

    Ok(items.iter().enumerate().map(|(index, item)| {
        item.as_object().ok_or(NormalizeError::InvalidElement {
            index,
            found: json_type(item),
        })
    }))
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Typed access to the fields of one provider object
struct Fields<'a>(&'a Map<String, Value>);

impl Fields<'_> {
    /// Present, non-null value of `key`
    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => {
                debug!(field = key, value = %other, "Ignoring non-text field");
                None
            },
        }
    }

    fn condition(&self, key: &str) -> Option<Condition> {
        self.text(key).map(|label| classify(&label))
    }

    fn number(&self, key: &str) -> Option<f64> {
        let value = self.get(key)?;
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite());

        if parsed.is_none() {
            debug!(field = key, value = %value, "Ignoring non-numeric field");
        }
        parsed
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range checked
    fn bearing(&self, key: &str) -> Option<u16> {
        let degrees = self.number(key)?;
        if (0.0..=360.0).contains(&degrees) {
            Some(degrees.round() as u16)
        } else {
            debug!(field = key, degrees, "Ignoring out-of-range wind bearing");
            None
        }
    }

    fn date(&self, key: &str) -> Option<NaiveDate> {
        let text = self.text(key)?;
        NaiveDate::parse_from_str(&text, "%Y-%m-%d")
            .inspect_err(|e| debug!(field = key, value = %text, error = %e, "Invalid date"))
            .ok()
    }

    /// QWeather times look like `2024-01-01T15:00+08:00` (no seconds)
    fn time(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        let text = self.text(key)?;
        DateTime::parse_from_rfc3339(&text)
            .or_else(|_| DateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M%:z"))
            .inspect_err(|e| debug!(field = key, value = %text, error = %e, "Invalid time"))
            .ok()
    }
}
