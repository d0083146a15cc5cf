//! Weather service port
//!
//! Defines how the hub retrieves normalized weather data. The adapter behind
//! it is bound to one location and API key.

use async_trait::async_trait;
use domain::{CurrentObservation, DailyForecastPoint, HourlyForecastPoint};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for weather service operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherPort: Send + Sync {
    /// Fetch the current observation
    async fn fetch_current(&self) -> Result<CurrentObservation, ApplicationError>;

    /// Fetch the hourly forecast in provider order
    async fn fetch_hourly(&self) -> Result<Vec<HourlyForecastPoint>, ApplicationError>;

    /// Fetch the daily forecast as day/night half-day records
    async fn fetch_daily(&self) -> Result<Vec<DailyForecastPoint>, ApplicationError>;

    /// Check if the weather service is available
    async fn is_available(&self) -> bool;
}
