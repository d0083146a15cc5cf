//! Refresh schedule configuration

use integration_qweather::UpdateFeature;
use serde::{Deserialize, Serialize};

use crate::scheduler::schedules;

/// Cron expressions for the three refresh tasks
///
/// Expressions use six fields (`sec min hour day month weekday`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Current observation refresh (default: every 10 minutes)
    #[serde(default = "default_now_cron")]
    pub now_cron: String,

    /// Hourly forecast refresh (default: every 15 minutes)
    #[serde(default = "default_hourly_cron")]
    pub hourly_cron: String,

    /// Daily forecast refresh (default: every 3 hours)
    #[serde(default = "default_daily_cron")]
    pub daily_cron: String,
}

fn default_now_cron() -> String {
    schedules::EVERY_10_MINUTES.to_string()
}

fn default_hourly_cron() -> String {
    schedules::EVERY_15_MINUTES.to_string()
}

fn default_daily_cron() -> String {
    schedules::EVERY_3_HOURS.to_string()
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            now_cron: default_now_cron(),
            hourly_cron: default_hourly_cron(),
            daily_cron: default_daily_cron(),
        }
    }
}

impl ScheduleConfig {
    /// Cron expression driving the refresh of `feature`
    #[must_use]
    pub fn cron_for(&self, feature: UpdateFeature) -> &str {
        match feature {
            UpdateFeature::Now => &self.now_cron,
            UpdateFeature::Hourly => &self.hourly_cron,
            UpdateFeature::Daily => &self.daily_cron,
        }
    }

    /// Check that every expression parses
    ///
    /// # Errors
    ///
    /// Returns the first field that is not a valid cron expression.
    pub fn validate(&self) -> Result<(), String> {
        for (field, expression) in [
            ("now_cron", &self.now_cron),
            ("hourly_cron", &self.hourly_cron),
            ("daily_cron", &self.daily_cron),
        ] {
            expression
                .parse::<cron::Schedule>()
                .map_err(|e| format!("schedule.{field} `{expression}`: {e}"))?;
        }
        Ok(())
    }
}
