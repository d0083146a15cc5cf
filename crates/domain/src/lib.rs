//! Domain layer for the QWeather hub
//!
//! Contains the canonical weather records, the condition vocabulary, validated
//! value objects, and domain errors. Provider-specific field names never appear
//! here; the integration crate maps vendor payloads onto these types.

pub mod entities;
pub mod errors;
pub mod units;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use units::Units;
pub use value_objects::*;
