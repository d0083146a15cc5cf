//! Application configuration
//!
//! Loaded from an optional `config.toml` and environment variables prefixed
//! with `QWEATHER_`, nested sections separated by `__`
//! (e.g. `QWEATHER_HUB__KEY`, `QWEATHER_API__TIMEOUT_SECS`).
//!
//! Split into focused sub-modules:
//! - `schedule`: cron expressions for the refresh tasks
//! - `logging`: log filter and output format

mod logging;
mod schedule;

use std::path::Path;

use application::{ApplicationError, HubSettings, ValidatedSettings};
use integration_qweather::QWeatherConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use logging::LoggingConfig;
pub use schedule::ScheduleConfig;

/// Prefix of environment variables read by [`AppConfig::load`]
pub const ENV_PREFIX: &str = "QWEATHER";

/// Default configuration file name (extension optional)
pub const DEFAULT_CONFIG_FILE: &str = "config";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Location and credentials of the hub
    #[serde(default)]
    pub hub: HubSettings,

    /// QWeather API connection settings
    #[serde(default)]
    pub api: QWeatherConfig,

    /// Refresh schedules
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// With `path` set the file must exist; otherwise `config.toml` in the
    /// working directory is used if present. Environment variables override
    /// file values.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, env_source())
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading configuration file");
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true)
            },
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = config::Config::builder()
            // Load from file if exists
            .add_source(file)
            // Override with environment variables (e.g., QWEATHER_HUB__LOCATION)
            .add_source(env)
            .build()?;
        config.try_deserialize()
    }

    /// Validate every section and produce the settings a hub is built from
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::Configuration`] for an invalid `api` or
    /// `schedule` section and [`ApplicationError::InvalidSettings`] with
    /// field-level codes for the `hub` section.
    pub fn validate(&self) -> Result<ValidatedSettings, ApplicationError> {
        self.api
            .validate()
            .map_err(|e| ApplicationError::Configuration(format!("api: {e}")))?;
        self.schedule
            .validate()
            .map_err(ApplicationError::Configuration)?;
        self.hub.validate()
    }
}

fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
