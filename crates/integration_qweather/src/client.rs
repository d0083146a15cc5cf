//! QWeather HTTP client

use std::time::Duration;

use async_trait::async_trait;
use domain::{ApiKey, LocationId};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::{
    config::QWeatherConfig,
    error::WeatherError,
    models::{ApiEnvelope, UpdateFeature},
};

/// Weather client trait for fetching raw provider payloads
///
/// Implementations return the endpoint's payload member (`now`, `hourly` or
/// `daily`) as parsed JSON. Normalization is left to the caller.
#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Fetch the payload for one data kind
    async fn fetch(&self, feature: UpdateFeature) -> Result<Value, WeatherError>;

    /// Fetch the real-time observation object
    async fn fetch_now(&self) -> Result<Value, WeatherError> {
        self.fetch(UpdateFeature::Now).await
    }

    /// Fetch the array of hourly forecast objects
    async fn fetch_hourly(&self) -> Result<Value, WeatherError> {
        self.fetch(UpdateFeature::Hourly).await
    }

    /// Fetch the array of daily forecast objects
    async fn fetch_daily(&self) -> Result<Value, WeatherError> {
        self.fetch(UpdateFeature::Daily).await
    }

    /// Check if the weather service is reachable with the configured key
    async fn is_healthy(&self) -> bool;
}

/// QWeather HTTP client implementation
pub struct QWeatherClient {
    client: Client,
    config: QWeatherConfig,
    location: LocationId,
    key: ApiKey,
}

impl std::fmt::Debug for QWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QWeatherClient")
            .field("base_url", &self.config.base_url)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl QWeatherClient {
    /// Create a new QWeather client for one location
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(
        config: QWeatherConfig,
        location: LocationId,
        key: ApiKey,
    ) -> Result<Self, WeatherError> {
        config.validate().map_err(WeatherError::ConfigurationError)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config,
            location,
            key,
        })
    }

    /// Location this client queries
    #[must_use]
    pub const fn location(&self) -> &LocationId {
        &self.location
    }

    /// Build the endpoint URL for a data kind (without query parameters)
    fn endpoint_url(&self, feature: UpdateFeature) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            feature.path()
        )
    }

    /// Map a transport error, dropping the request URL since its query
    /// string carries the API key
    fn map_send_error(&self, err: reqwest::Error) -> WeatherError {
        let err = err.without_url();
        if err.is_timeout() {
            WeatherError::Timeout {
                timeout_secs: self.config.timeout_secs,
            }
        } else if err.is_connect() {
            WeatherError::ConnectionFailed(err.to_string())
        } else {
            WeatherError::RequestFailed(err.to_string())
        }
    }
}

#[async_trait]
impl WeatherClient for QWeatherClient {
    #[instrument(skip(self, feature), fields(feature = %feature, location = %self.location))]
    async fn fetch(&self, feature: UpdateFeature) -> Result<Value, WeatherError> {
        let url = self.endpoint_url(feature);
        debug!(url = %url, "Fetching weather data");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("location", self.location.as_str()),
                ("key", self.key.expose()),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let envelope: ApiEnvelope = response.json().await.map_err(|e| {
            if e.is_timeout() {
                WeatherError::Timeout {
                    timeout_secs: self.config.timeout_secs,
                }
            } else {
                WeatherError::ParseError(e.without_url().to_string())
            }
        })?;

        debug!(
            update_time = envelope.update_time.as_deref().unwrap_or("-"),
            "Received weather data"
        );

        envelope.into_member(feature)
    }

    async fn is_healthy(&self) -> bool {
        self.fetch(UpdateFeature::Now).await.is_ok()
    }
}
