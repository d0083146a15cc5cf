//! Application layer - Use cases and orchestration
//!
//! Holds the [`WeatherHub`] that owns the refreshed weather state, the
//! validation of hub settings, and the [`WeatherPort`] through which the hub
//! reaches the weather provider.

pub mod error;
pub mod ports;
pub mod services;
pub mod settings;

pub use error::{ApplicationError, FieldErrors};
pub use ports::*;
pub use services::*;
pub use settings::{HubSettings, ValidatedSettings};
