//! QWeather error types

use thiserror::Error;

/// Errors that can occur while talking to the QWeather API
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Connection to the weather service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the weather service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from the weather service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider answered with a non-success status code in the response body
    #[error("QWeather API returned status code {0}")]
    ApiStatus(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

/// Raw payload does not have the shape the normalizer expects
///
/// Only top-level shape violations end up here. Missing or unparseable
/// individual fields are not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Top-level value has the wrong JSON type
    #[error("Expected {expected}, found {found}")]
    UnexpectedShape {
        /// JSON type the normalizer needs
        expected: &'static str,
        /// JSON type actually received
        found: &'static str,
    },

    /// An element of a forecast array is not an object
    #[error("Forecast element {index} is {found}, expected an object")]
    InvalidElement {
        /// Position in the source array
        index: usize,
        /// JSON type actually received
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WeatherError::ApiStatus("402".to_string());
        assert!(err.to_string().contains("402"));

        let err = WeatherError::Timeout { timeout_secs: 20 };
        assert!(err.to_string().contains("20"));

        let err = NormalizeError::UnexpectedShape {
            expected: "an array",
            found: "an object",
        };
        assert_eq!(err.to_string(), "Expected an array, found an object");

        let err = NormalizeError::InvalidElement {
            index: 3,
            found: "a string",
        };
        assert!(err.to_string().contains('3'));
    }
}
