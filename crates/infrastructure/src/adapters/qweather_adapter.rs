//! Weather adapter - Implements WeatherPort using integration_qweather

use application::{ApplicationError, ValidatedSettings, WeatherPort};
use async_trait::async_trait;
use domain::{CurrentObservation, DailyForecastPoint, HourlyForecastPoint};
use integration_qweather::{
    NormalizeError, QWeatherClient, QWeatherConfig, WeatherClient, WeatherError,
    normalize_current, normalize_daily, normalize_hourly,
};
use tracing::{debug, instrument};

/// Adapter for the QWeather API, bound to one location
pub struct QWeatherAdapter<C = QWeatherClient> {
    client: C,
}

impl<C> std::fmt::Debug for QWeatherAdapter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QWeatherAdapter").finish_non_exhaustive()
    }
}

impl QWeatherAdapter {
    /// Create an adapter for the location and key in `settings`
    ///
    /// # Errors
    ///
    /// Returns an error if the API configuration is invalid or the HTTP
    /// client fails to initialize.
    pub fn new(
        config: QWeatherConfig,
        settings: &ValidatedSettings,
    ) -> Result<Self, ApplicationError> {
        let client = QWeatherClient::new(
            config,
            settings.location().clone(),
            settings.key().clone(),
        )
        .map_err(Self::map_error)?;
        Ok(Self::with_client(client))
    }
}

impl<C: WeatherClient> QWeatherAdapter<C> {
    /// Wrap an existing client
    pub const fn with_client(client: C) -> Self {
        Self { client }
    }

    /// Map integration weather error to application error
    fn map_error(err: WeatherError) -> ApplicationError {
        match err {
            WeatherError::ConnectionFailed(e)
            | WeatherError::RequestFailed(e)
            | WeatherError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            WeatherError::Timeout { .. } | WeatherError::ApiStatus(_) => {
                ApplicationError::ExternalService(err.to_string())
            },
            WeatherError::RateLimitExceeded => ApplicationError::RateLimited,
            WeatherError::ParseError(e) => ApplicationError::DataShape(e),
            WeatherError::ConfigurationError(e) => ApplicationError::Configuration(e),
        }
    }

    fn map_normalize_error(err: NormalizeError) -> ApplicationError {
        ApplicationError::DataShape(err.to_string())
    }
}

#[async_trait]
impl<C: WeatherClient> WeatherPort for QWeatherAdapter<C> {
    #[instrument(skip(self))]
    async fn fetch_current(&self) -> Result<CurrentObservation, ApplicationError> {
        let raw = self.client.fetch_now().await.map_err(Self::map_error)?;
        let current = normalize_current(&raw).map_err(Self::map_normalize_error)?;
        debug!(
            condition = ?current.condition,
            temperature = ?current.temperature,
            "Retrieved current weather"
        );
        Ok(current)
    }

    #[instrument(skip(self))]
    async fn fetch_hourly(&self) -> Result<Vec<HourlyForecastPoint>, ApplicationError> {
        let raw = self.client.fetch_hourly().await.map_err(Self::map_error)?;
        let points = normalize_hourly(&raw).map_err(Self::map_normalize_error)?;
        debug!(points = points.len(), "Retrieved hourly forecast");
        Ok(points)
    }

    #[instrument(skip(self))]
    async fn fetch_daily(&self) -> Result<Vec<DailyForecastPoint>, ApplicationError> {
        let raw = self.client.fetch_daily().await.map_err(Self::map_error)?;
        let points = normalize_daily(&raw).map_err(Self::map_normalize_error)?;
        debug!(points = points.len(), "Retrieved daily forecast");
        Ok(points)
    }

    async fn is_available(&self) -> bool {
        self.client.is_healthy().await
    }
}

#[cfg(test)]
mod tests {
    use domain::{Condition, ConditionCategory};
    use integration_qweather::UpdateFeature;
    use serde_json::{Value, json};

    use super::*;

    /// Client returning canned payloads, or one error for every request
    struct FakeClient {
        now: Value,
        hourly: Value,
        daily: Value,
        fail_with: Option<fn() -> WeatherError>,
    }

    impl FakeClient {
        fn ok() -> Self {
            Self {
                now: json!({"temp": "21", "text": "晴", "humidity": "40"}),
                hourly: json!([{"fxTime": "2024-01-01T13:00+08:00", "temp": "20", "text": "多云"}]),
                daily: json!([{"fxDate": "2024-01-01", "tempMax": "25", "tempMin": "14",
                               "textDay": "晴", "textNight": "小雨"}]),
                fail_with: None,
            }
        }

        fn failing(make: fn() -> WeatherError) -> Self {
            Self {
                fail_with: Some(make),
                ..Self::ok()
            }
        }
    }

    #[async_trait]
    impl WeatherClient for FakeClient {
        async fn fetch(&self, feature: UpdateFeature) -> Result<Value, WeatherError> {
            if let Some(make) = self.fail_with {
                return Err(make());
            }
            Ok(match feature {
                UpdateFeature::Now => self.now.clone(),
                UpdateFeature::Hourly => self.hourly.clone(),
                UpdateFeature::Daily => self.daily.clone(),
            })
        }

        async fn is_healthy(&self) -> bool {
            self.fail_with.is_none()
        }
    }

    #[tokio::test]
    async fn fetch_current_normalizes() {
        let adapter = QWeatherAdapter::with_client(FakeClient::ok());
        let current = adapter.fetch_current().await.unwrap();
        assert_eq!(current.temperature, Some(21.0));
        assert_eq!(current.humidity, Some(40.0));
        assert_eq!(current.condition, Some(Condition::Category(ConditionCategory::Sunny)));
    }

    #[tokio::test]
    async fn fetch_hourly_normalizes() {
        let adapter = QWeatherAdapter::with_client(FakeClient::ok());
        let points = adapter.fetch_hourly().await.unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].temperature, Some(20.0));
    }

    #[tokio::test]
    async fn fetch_daily_splits_into_halves() {
        let adapter = QWeatherAdapter::with_client(FakeClient::ok());
        let points = adapter.fetch_daily().await.unwrap();
        assert_eq!(points.len(), 2);
        assert!(points[0].is_daytime);
        assert!(!points[1].is_daytime);
        assert_eq!(
            points[1].condition,
            Some(Condition::Category(ConditionCategory::Rainy))
        );
    }

    #[tokio::test]
    async fn wrong_shape_is_data_shape_error() {
        let client = FakeClient {
            hourly: json!({"not": "an array"}),
            ..FakeClient::ok()
        };
        let adapter = QWeatherAdapter::with_client(client);
        let result = adapter.fetch_hourly().await;
        assert!(matches!(result, Err(ApplicationError::DataShape(_))));
    }

    #[tokio::test]
    async fn client_errors_are_mapped() {
        let adapter = QWeatherAdapter::with_client(FakeClient::failing(|| {
            WeatherError::RateLimitExceeded
        }));
        assert!(matches!(
            adapter.fetch_current().await,
            Err(ApplicationError::RateLimited)
        ));
        assert!(!adapter.is_available().await);
    }

    #[test]
    fn map_error_transport_failures() {
        for err in [
            WeatherError::ConnectionFailed("refused".into()),
            WeatherError::RequestFailed("403".into()),
            WeatherError::ServiceUnavailable("503".into()),
            WeatherError::Timeout { timeout_secs: 20 },
            WeatherError::ApiStatus("401".into()),
        ] {
            let mapped = QWeatherAdapter::<FakeClient>::map_error(err);
            assert!(matches!(mapped, ApplicationError::ExternalService(_)));
        }
    }

    #[test]
    fn map_error_api_status_keeps_code() {
        let mapped = QWeatherAdapter::<FakeClient>::map_error(WeatherError::ApiStatus("402".into()));
        assert!(mapped.to_string().contains("402"));
    }

    #[test]
    fn map_error_parse_and_config() {
        assert!(matches!(
            QWeatherAdapter::<FakeClient>::map_error(WeatherError::ParseError("bad".into())),
            ApplicationError::DataShape(_)
        ));
        assert!(matches!(
            QWeatherAdapter::<FakeClient>::map_error(WeatherError::ConfigurationError("x".into())),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn new_rejects_invalid_config() {
        let settings = application::HubSettings::new(
            "home",
            "101010100",
            "0123456789abcdef0123456789abcdef",
        )
        .validate()
        .unwrap();
        let config = QWeatherConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            QWeatherAdapter::new(config, &settings),
            Err(ApplicationError::Configuration(_))
        ));
    }

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<QWeatherAdapter>();
    }
}
