//! Infrastructure layer - Adapters for external systems
//!
//! Implements the weather port on top of the QWeather client and provides
//! configuration loading, logging setup and the cron scheduler driving the
//! periodic refreshes.

pub mod adapters;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::QWeatherAdapter;
pub use config::{AppConfig, LoggingConfig, ScheduleConfig};
pub use scheduled_tasks::{create_weather_refresh_task, schedule_weather_tasks};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats};
pub use telemetry::{TelemetryError, init_tracing};
