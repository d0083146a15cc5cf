//! Provider API key value object

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::errors::DomainError;

/// A QWeather API key
///
/// Keys issued by the provider are exactly [`ApiKey::LENGTH`] characters. The
/// value is kept in a [`SecretString`] and redacted from `Debug` output.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Required key length in characters
    pub const LENGTH: usize = 32;

    /// Create a new API key, validating its length
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        let actual = key.chars().count();
        if actual != Self::LENGTH {
            return Err(DomainError::InvalidApiKey {
                expected: Self::LENGTH,
                actual,
            });
        }
        Ok(Self(SecretString::from(key)))
    }

    /// Expose the key for use in a request
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl TryFrom<String> for ApiKey {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
