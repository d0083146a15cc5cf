//! QWeather integration
//!
//! Client for the QWeather (和风天气) Weather API (<https://dev.qweather.com>).
//! Fetches the `now`, `24h` and `7d` endpoints and normalizes the vendor
//! payloads into the canonical records of the `domain` crate.
//!
//! # Architecture
//!
//! [`WeatherClient`] defines the transport interface, implemented by
//! [`QWeatherClient`]. The [`normalizer`] module is pure: it renames vendor
//! fields to canonical attributes and classifies free-text condition labels
//! with [`classify`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_qweather::{QWeatherClient, QWeatherConfig, WeatherClient, normalize_current};
//!
//! let client = QWeatherClient::new(QWeatherConfig::default(), location, key)?;
//! let raw = client.fetch_now().await?;
//! let current = normalize_current(&raw)?;
//! ```

mod client;
mod conditions;
mod config;
mod error;
mod models;
pub mod normalizer;

pub use client::{QWeatherClient, WeatherClient};
pub use conditions::{classify, known_labels, labels_for};
pub use config::QWeatherConfig;
pub use error::{NormalizeError, WeatherError};
pub use models::UpdateFeature;
pub use normalizer::{normalize_current, normalize_daily, normalize_hourly};
