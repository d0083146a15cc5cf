//! QWeather client configuration

use serde::{Deserialize, Serialize};

/// Connection settings for the QWeather API
///
/// Credentials and the location are not part of this struct; they are
/// validated hub settings and handed to the client separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QWeatherConfig {
    /// Base URL of the weather endpoints (default: <https://devapi.qweather.com/v7/weather>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds (default: 20)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://devapi.qweather.com/v7/weather".to_string()
}

const fn default_timeout_secs() -> u64 {
    20
}

impl Default for QWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl QWeatherConfig {
    /// Create a configuration suitable for testing against a mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 5,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("base_url must be an http(s) URL".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QWeatherConfig::default();
        assert_eq!(config.base_url, "https://devapi.qweather.com/v7/weather");
        assert_eq!(config.timeout_secs, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_config() {
        let config = QWeatherConfig::for_testing("http://127.0.0.1:8080");
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_validation_empty_base_url() {
        let config = QWeatherConfig {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_non_http_base_url() {
        let config = QWeatherConfig {
            base_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = QWeatherConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: QWeatherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.timeout_secs, 20);
        assert_eq!(config.base_url, default_base_url());
    }
}
