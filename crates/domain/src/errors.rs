//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// API key does not have the expected length
    #[error("Invalid API key: expected {expected} characters, got {actual}")]
    InvalidApiKey {
        /// Required key length
        expected: usize,
        /// Length of the rejected key
        actual: usize,
    },

    /// Location identifier is empty or not numeric
    #[error("Invalid location identifier: {0}")]
    InvalidLocation(String),

    /// Display name is empty
    #[error("Location name must not be empty")]
    EmptyLocationName,

    /// Unknown condition category name
    #[error("Unknown condition category: {0}")]
    UnknownCategory(String),
}
