//! Application services

mod weather_hub;

pub use weather_hub::{ATTRIBUTION, DeviceInfo, WeatherHub, WeatherSnapshot};
