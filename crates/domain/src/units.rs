//! Native units of the canonical weather records
//!
//! Every numeric attribute is stored in the unit the provider reports, so the
//! presentation layer converts from these when it needs something else.

use serde::Serialize;

/// Temperature unit for temperature and dew point values
pub const TEMPERATURE: &str = "°C";

/// Pressure unit
pub const PRESSURE: &str = "hPa";

/// Wind speed unit
pub const WIND_SPEED: &str = "km/h";

/// Precipitation depth unit
pub const PRECIPITATION: &str = "mm";

/// Visibility unit
pub const VISIBILITY: &str = "km";

/// The unit set attached to published records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Units {
    pub temperature: &'static str,
    pub pressure: &'static str,
    pub wind_speed: &'static str,
    pub precipitation: &'static str,
    pub visibility: &'static str,
}

impl Units {
    /// Units of the values as the provider reports them
    pub const NATIVE: Self = Self {
        temperature: TEMPERATURE,
        pressure: PRESSURE,
        wind_speed: WIND_SPEED,
        precipitation: PRECIPITATION,
        visibility: VISIBILITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_units_serialize_by_attribute() {
        let json = serde_json::to_value(Units::NATIVE).unwrap();
        assert_eq!(json["temperature"], "°C");
        assert_eq!(json["wind_speed"], "km/h");
        assert_eq!(json["visibility"], "km");
    }
}
