//! Factory functions for the weather refresh tasks
//!
//! Provides task closures for the scheduler to run, one per data kind:
//! - Current observation (`weather_now`)
//! - Hourly forecast (`weather_hourly`)
//! - Daily forecast (`weather_daily`)

use std::sync::Arc;

use application::WeatherHub;
use futures::future::BoxFuture;
use integration_qweather::UpdateFeature;
use tracing::debug;

use crate::{
    config::ScheduleConfig,
    scheduler::{SchedulerError, TaskScheduler},
};

/// Task name for the current observation refresh
pub const WEATHER_NOW_TASK: &str = "weather_now";
/// Task name for the hourly forecast refresh
pub const WEATHER_HOURLY_TASK: &str = "weather_hourly";
/// Task name for the daily forecast refresh
pub const WEATHER_DAILY_TASK: &str = "weather_daily";

/// Scheduler task name for a data kind
#[must_use]
pub const fn task_name(feature: UpdateFeature) -> &'static str {
    match feature {
        UpdateFeature::Now => WEATHER_NOW_TASK,
        UpdateFeature::Hourly => WEATHER_HOURLY_TASK,
        UpdateFeature::Daily => WEATHER_DAILY_TASK,
    }
}

/// Create a task closure refreshing one data kind of `hub`
///
/// A failed refresh leaves the hub's previous data in place and is reported
/// to the scheduler as an error.
pub fn create_weather_refresh_task(
    hub: Arc<WeatherHub>,
    feature: UpdateFeature,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let hub = Arc::clone(&hub);

        Box::pin(async move {
            debug!(feature = %feature, location = %hub.unique_id(), "Refreshing weather data");

            let result = match feature {
                UpdateFeature::Now => hub.update_now().await,
                UpdateFeature::Hourly => hub.update_hourly().await,
                UpdateFeature::Daily => hub.update_daily().await,
            };
            result.map_err(|e| format!("{feature} refresh failed: {e}"))
        })
    }
}

/// Register the three refresh tasks of `hub` on `scheduler`
///
/// # Errors
///
/// Returns an error if a cron expression is invalid or a task with the same
/// name is already scheduled.
pub async fn schedule_weather_tasks(
    scheduler: &TaskScheduler,
    hub: &Arc<WeatherHub>,
    schedule: &ScheduleConfig,
) -> Result<(), SchedulerError> {
    for feature in UpdateFeature::ALL {
        scheduler
            .add_task(
                task_name(feature),
                schedule.cron_for(feature),
                create_weather_refresh_task(Arc::clone(hub), feature),
            )
            .await?;
    }
    Ok(())
}
