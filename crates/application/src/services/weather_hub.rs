//! Weather hub service
//!
//! Owns the latest normalized weather data for one location. Each data kind
//! lives in its own slot that is replaced wholesale on a successful refresh
//! and left untouched when a refresh fails, so readers always see a complete
//! value: either the previous one or the new one.

use std::{fmt, future::Future, sync::Arc};

use arc_swap::ArcSwap;
use domain::{Condition, CurrentObservation, DailyForecastPoint, HourlyForecastPoint, Units};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::{error::ApplicationError, ports::WeatherPort, settings::ValidatedSettings};

/// Attribution shown next to QWeather data
pub const ATTRIBUTION: &str = "来自和风天气的天气数据";

/// Static description of the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Display name of the source
    pub name: &'static str,
    /// Data provider
    pub manufacturer: &'static str,
    /// Product line
    pub model: &'static str,
    /// Where the API key is managed
    pub configuration_url: &'static str,
}

impl DeviceInfo {
    /// The QWeather forecast service
    pub const QWEATHER: Self = Self {
        name: "天气预报",
        manufacturer: "和风天气",
        model: "Forecast",
        configuration_url: "https://console.qweather.com/#/console",
    };
}

/// Point-in-time copy of everything the hub exposes
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSnapshot {
    /// Display name (`weather-<location name>`)
    pub name: String,
    /// Stable identifier (the location name)
    pub unique_id: String,
    /// Data attribution, present once a condition is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<&'static str>,
    /// Current observation, if fetched
    pub current: Option<CurrentObservation>,
    /// Hourly forecast in provider order
    pub hourly: Vec<HourlyForecastPoint>,
    /// Day/night half-day forecast records
    pub daily: Vec<DailyForecastPoint>,
    /// Units of every numeric value above
    pub units: Units,
}

/// Atomically replaced value with a single writer
#[derive(Debug)]
struct Slot<T> {
    value: ArcSwap<T>,
    writer: Mutex<()>,
}

impl<T> Slot<T> {
    fn new(initial: T) -> Self {
        Self {
            value: ArcSwap::from_pointee(initial),
            writer: Mutex::new(()),
        }
    }

    fn load(&self) -> Arc<T> {
        self.value.load_full()
    }

    /// Run `fetch` while holding the writer lock and store its result
    async fn refresh<F>(&self, feature: &'static str, fetch: F) -> Result<(), ApplicationError>
    where
        F: Future<Output = Result<T, ApplicationError>>,
    {
        let _writer = self.writer.lock().await;
        match fetch.await {
            Ok(value) => {
                self.value.store(Arc::new(value));
                debug!(feature, "Weather data updated");
                Ok(())
            },
            Err(e) => {
                error!(feature, error = %e, "Error while updating weather data, keeping previous values");
                Err(e)
            },
        }
    }
}

/// Weather state for one configured location
///
/// Slots start empty: no current observation and empty forecasts until the
/// first successful refresh of each kind.
pub struct WeatherHub {
    settings: ValidatedSettings,
    port: Arc<dyn WeatherPort>,
    current: Slot<Option<CurrentObservation>>,
    hourly: Slot<Vec<HourlyForecastPoint>>,
    daily: Slot<Vec<DailyForecastPoint>>,
}

impl fmt::Debug for WeatherHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherHub")
            .field("settings", &self.settings)
            .field("current", &self.current)
            .field("hourly", &self.hourly.load().len())
            .field("daily", &self.daily.load().len())
            .finish_non_exhaustive()
    }
}

impl WeatherHub {
    /// Create a hub with empty slots
    #[must_use]
    pub fn new(settings: ValidatedSettings, port: Arc<dyn WeatherPort>) -> Self {
        Self {
            settings,
            port,
            current: Slot::new(None),
            hourly: Slot::new(Vec::new()),
            daily: Slot::new(Vec::new()),
        }
    }

    /// Settings this hub was built from
    #[must_use]
    pub const fn settings(&self) -> &ValidatedSettings {
        &self.settings
    }

    /// Refresh the current observation
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous observation is kept.
    #[instrument(skip(self), fields(hub = %self.settings.location_name()))]
    pub async fn update_now(&self) -> Result<(), ApplicationError> {
        self.current
            .refresh("now", async { self.port.fetch_current().await.map(Some) })
            .await
    }

    /// Refresh the hourly forecast
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous forecast is kept.
    #[instrument(skip(self), fields(hub = %self.settings.location_name()))]
    pub async fn update_hourly(&self) -> Result<(), ApplicationError> {
        self.hourly.refresh("hourly", self.port.fetch_hourly()).await
    }

    /// Refresh the daily forecast
    ///
    /// # Errors
    ///
    /// Returns the fetch error; the previous forecast is kept.
    #[instrument(skip(self), fields(hub = %self.settings.location_name()))]
    pub async fn update_daily(&self) -> Result<(), ApplicationError> {
        self.daily.refresh("daily", self.port.fetch_daily()).await
    }

    /// Initial fetch of all data kinds, in order now, hourly, daily
    ///
    /// A failing kind does not stop the others. Returns the number of kinds
    /// that failed.
    pub async fn refresh_all(&self) -> usize {
        info!(hub = %self.settings.location_name(), "Updating weather data from QWeather");

        let results = [
            self.update_now().await,
            self.update_hourly().await,
            self.update_daily().await,
        ];
        let failed = results.iter().filter(|r| r.is_err()).count();

        if failed > 0 {
            warn!(failed, "Initial weather refresh incomplete");
        }
        failed
    }

    /// Whether the provider is reachable
    pub async fn is_available(&self) -> bool {
        self.port.is_available().await
    }

    fn observed<R>(&self, f: impl FnOnce(&CurrentObservation) -> Option<R>) -> Option<R> {
        match &**self.current.value.load() {
            Some(obs) => f(obs),
            None => None,
        }
    }

    /// Latest current observation
    #[must_use]
    pub fn current(&self) -> Option<CurrentObservation> {
        self.observed(|obs| Some(obs.clone()))
    }

    #[must_use]
    pub fn condition(&self) -> Option<Condition> {
        self.observed(|obs| obs.condition.clone())
    }

    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.observed(|obs| obs.temperature)
    }

    #[must_use]
    pub fn apparent_temperature(&self) -> Option<f64> {
        self.observed(|obs| obs.apparent_temperature)
    }

    #[must_use]
    pub fn dew_point(&self) -> Option<f64> {
        self.observed(|obs| obs.dew_point)
    }

    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.observed(|obs| obs.humidity)
    }

    #[must_use]
    pub fn wind_bearing(&self) -> Option<u16> {
        self.observed(|obs| obs.wind_bearing)
    }

    #[must_use]
    pub fn wind_speed(&self) -> Option<f64> {
        self.observed(|obs| obs.wind_speed)
    }

    #[must_use]
    pub fn cloud_coverage(&self) -> Option<f64> {
        self.observed(|obs| obs.cloud_coverage)
    }

    #[must_use]
    pub fn visibility(&self) -> Option<f64> {
        self.observed(|obs| obs.visibility)
    }

    #[must_use]
    pub fn pressure(&self) -> Option<f64> {
        self.observed(|obs| obs.pressure)
    }

    /// Hourly forecast in provider order
    #[must_use]
    pub fn forecast_hourly(&self) -> Arc<Vec<HourlyForecastPoint>> {
        self.hourly.load()
    }

    /// Daily forecast as day/night pairs
    #[must_use]
    pub fn forecast_twice_daily(&self) -> Arc<Vec<DailyForecastPoint>> {
        self.daily.load()
    }

    /// Display name, `weather-<location name>`
    #[must_use]
    pub fn name(&self) -> String {
        format!("weather-{}", self.settings.location_name())
    }

    /// Stable identifier of this hub
    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.settings.location_name().as_str()
    }

    #[must_use]
    pub const fn attribution(&self) -> &'static str {
        ATTRIBUTION
    }

    #[must_use]
    pub const fn device_info(&self) -> DeviceInfo {
        DeviceInfo::QWEATHER
    }

    /// Copy of all exposed state
    #[must_use]
    pub fn snapshot(&self) -> WeatherSnapshot {
        let current = self.current();
        let attribution = current
            .as_ref()
            .and_then(|obs| obs.condition.as_ref())
            .map(|_| ATTRIBUTION);

        WeatherSnapshot {
            name: self.name(),
            unique_id: self.unique_id().to_string(),
            attribution,
            current,
            hourly: self.forecast_hourly().as_ref().clone(),
            daily: self.forecast_twice_daily().as_ref().clone(),
            units: Units::NATIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use async_trait::async_trait;
    use domain::ConditionCategory;
    use mockall::Sequence;

    use super::*;
    use crate::{ports::MockWeatherPort, settings::HubSettings};

    fn settings() -> ValidatedSettings {
        HubSettings::new("home", "101010100", "0123456789abcdef0123456789abcdef")
            .validate()
            .unwrap()
    }

    fn observation(temperature: f64) -> CurrentObservation {
        CurrentObservation {
            condition: Some(Condition::Category(ConditionCategory::Sunny)),
            temperature: Some(temperature),
            humidity: Some(60.0),
            wind_bearing: Some(90),
            ..Default::default()
        }
    }

    fn hourly_point(temperature: f64) -> HourlyForecastPoint {
        HourlyForecastPoint {
            temperature: Some(temperature),
            ..Default::default()
        }
    }

    fn daily_pair() -> Vec<DailyForecastPoint> {
        vec![DailyForecastPoint::empty(true), DailyForecastPoint::empty(false)]
    }

    fn hub(port: MockWeatherPort) -> WeatherHub {
        WeatherHub::new(settings(), Arc::new(port))
    }

    #[test]
    fn new_hub_is_empty() {
        let hub = hub(MockWeatherPort::new());
        assert!(hub.current().is_none());
        assert!(hub.temperature().is_none());
        assert!(hub.condition().is_none());
        assert!(hub.forecast_hourly().is_empty());
        assert!(hub.forecast_twice_daily().is_empty());
    }

    #[test]
    fn identity_and_attribution() {
        let hub = hub(MockWeatherPort::new());
        assert_eq!(hub.name(), "weather-home");
        assert_eq!(hub.unique_id(), "home");
        assert_eq!(hub.attribution(), "来自和风天气的天气数据");
        assert_eq!(hub.device_info().manufacturer, "和风天气");
    }

    #[tokio::test]
    async fn update_now_populates_properties() {
        let mut port = MockWeatherPort::new();
        port.expect_fetch_current()
            .times(1)
            .returning(|| Ok(observation(21.0)));

        let hub = hub(port);
        hub.update_now().await.unwrap();

        assert_eq!(hub.temperature(), Some(21.0));
        assert_eq!(hub.humidity(), Some(60.0));
        assert_eq!(hub.wind_bearing(), Some(90));
        assert_eq!(hub.condition().unwrap(), "sunny");
        assert!(hub.pressure().is_none());
        assert!(hub.visibility().is_none());
    }

    #[tokio::test]
    async fn failed_update_keeps_previous_observation() {
        let mut seq = Sequence::new();
        let mut port = MockWeatherPort::new();
        port.expect_fetch_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(observation(21.0)));
        port.expect_fetch_current()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(ApplicationError::ExternalService("timeout".into())));

        let hub = hub(port);
        hub.update_now().await.unwrap();
        let result = hub.update_now().await;

        assert!(matches!(result, Err(ApplicationError::ExternalService(_))));
        assert_eq!(hub.temperature(), Some(21.0));
    }

    #[tokio::test]
    async fn failed_first_update_leaves_slot_empty() {
        let mut port = MockWeatherPort::new();
        port.expect_fetch_hourly()
            .times(1)
            .returning(|| Err(ApplicationError::RateLimited));

        let hub = hub(port);
        assert!(hub.update_hourly().await.is_err());
        assert!(hub.forecast_hourly().is_empty());
    }

    #[tokio::test]
    async fn forecasts_are_replaced_wholesale() {
        let mut seq = Sequence::new();
        let mut port = MockWeatherPort::new();
        port.expect_fetch_hourly()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![hourly_point(1.0), hourly_point(2.0), hourly_point(3.0)]));
        port.expect_fetch_hourly()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(vec![hourly_point(9.0)]));

        let hub = hub(port);
        hub.update_hourly().await.unwrap();
        let before = hub.forecast_hourly();
        hub.update_hourly().await.unwrap();

        assert_eq!(before.len(), 3);
        let after = hub.forecast_hourly();
        assert_eq!(after.len(), 1);
        assert_eq!(after[0].temperature, Some(9.0));
    }

    #[tokio::test]
    async fn slots_are_independent() {
        let mut port = MockWeatherPort::new();
        port.expect_fetch_current()
            .returning(|| Ok(observation(5.0)));
        port.expect_fetch_hourly()
            .returning(|| Err(ApplicationError::DataShape("expected an array".into())));
        port.expect_fetch_daily().returning(|| Ok(daily_pair()));

        let hub = hub(port);
        hub.update_now().await.unwrap();
        assert!(hub.update_hourly().await.is_err());
        hub.update_daily().await.unwrap();

        assert_eq!(hub.temperature(), Some(5.0));
        assert!(hub.forecast_hourly().is_empty());
        assert_eq!(hub.forecast_twice_daily().len(), 2);
    }

    #[tokio::test]
    async fn refresh_all_continues_after_failure() {
        let mut port = MockWeatherPort::new();
        port.expect_fetch_current()
            .times(1)
            .returning(|| Err(ApplicationError::ExternalService("down".into())));
        port.expect_fetch_hourly()
            .times(1)
            .returning(|| Ok(vec![hourly_point(1.0)]));
        port.expect_fetch_daily()
            .times(1)
            .returning(|| Ok(daily_pair()));

        let hub = hub(port);
        assert_eq!(hub.refresh_all().await, 1);

        assert!(hub.current().is_none());
        assert_eq!(hub.forecast_hourly().len(), 1);
        assert_eq!(hub.forecast_twice_daily().len(), 2);
    }

    #[tokio::test]
    async fn snapshot_includes_attribution_once_condition_known() {
        let mut port = MockWeatherPort::new();
        port.expect_fetch_current()
            .times(1)
            .returning(|| Ok(observation(12.0)));

        let hub = hub(port);
        assert!(hub.snapshot().attribution.is_none());

        hub.update_now().await.unwrap();
        let snapshot = hub.snapshot();
        assert_eq!(snapshot.attribution, Some(ATTRIBUTION));
        assert_eq!(snapshot.name, "weather-home");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["current"]["temperature"], 12.0);
        assert_eq!(json["current"]["condition"], "sunny");
        assert_eq!(json["units"]["pressure"], "hPa");
    }

    #[tokio::test]
    async fn is_available_delegates_to_port() {
        let mut port = MockWeatherPort::new();
        port.expect_is_available().times(1).returning(|| false);
        assert!(!hub(port).is_available().await);
    }

    /// Port that records how many current fetches overlap
    #[derive(Default)]
    struct OverlapPort {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl WeatherPort for OverlapPort {
        async fn fetch_current(&self) -> Result<CurrentObservation, ApplicationError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(CurrentObservation::default())
        }

        async fn fetch_hourly(&self) -> Result<Vec<HourlyForecastPoint>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn fetch_daily(&self) -> Result<Vec<DailyForecastPoint>, ApplicationError> {
            Ok(Vec::new())
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn updates_of_one_slot_do_not_overlap() {
        let port = Arc::new(OverlapPort::default());
        let hub = WeatherHub::new(settings(), port.clone());

        let (a, b, c) = tokio::join!(hub.update_now(), hub.update_now(), hub.update_now());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(port.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
