//! Hub settings and their validation
//!
//! [`HubSettings`] is the raw, user-supplied shape. A hub can only be built
//! from [`ValidatedSettings`], which [`HubSettings::validate`] produces after
//! every field passed.

use std::fmt;

use domain::{ApiKey, LocationId, LocationName};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::{ApplicationError, FieldErrors};

/// User-supplied settings for one weather hub
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct HubSettings {
    /// Display name of the location, also the hub's unique id
    #[serde(default)]
    #[validate(length(min = 1, code = "invalid_name"))]
    pub location_name: String,

    /// QWeather location id (digits only, e.g. `101010100`)
    #[serde(default)]
    #[validate(custom(function = "validate_location"))]
    pub location: String,

    /// QWeather API key (sensitive, 32 characters)
    ///
    /// Checked by hand in [`HubSettings::validate`]; the derive cannot see
    /// through the secret wrapper.
    #[serde(default = "empty_key", skip_serializing)]
    pub key: SecretString,
}

fn empty_key() -> SecretString {
    SecretString::from(String::new())
}

fn validate_location(location: &str) -> Result<(), ValidationError> {
    if !location.is_empty() && location.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_location"))
    }
}

fn key_has_valid_length(key: &SecretString) -> bool {
    key.expose_secret().chars().count() == ApiKey::LENGTH
}

impl fmt::Debug for HubSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubSettings")
            .field("location_name", &self.location_name)
            .field("location", &self.location)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Default for HubSettings {
    fn default() -> Self {
        Self::new(String::new(), String::new(), String::new())
    }
}

impl HubSettings {
    /// Create settings from raw values
    pub fn new(
        location_name: impl Into<String>,
        location: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            location_name: location_name.into(),
            location: location.into(),
            key: SecretString::from(key.into()),
        }
    }

    /// Check every field and convert into [`ValidatedSettings`]
    ///
    /// All failing fields are reported at once.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::InvalidSettings`] with one error code per
    /// failing field.
    pub fn validate(&self) -> Result<ValidatedSettings, ApplicationError> {
        let mut errors =
            Validate::validate(self).map_or_else(FieldErrors::from, |()| FieldErrors::new());
        if !key_has_valid_length(&self.key) {
            errors.insert("key", "invalid_key");
        }
        if !errors.is_empty() {
            return Err(ApplicationError::InvalidSettings(errors));
        }

        Ok(ValidatedSettings {
            location_name: LocationName::new(self.location_name.clone())?,
            location: LocationId::new(self.location.clone())?,
            key: ApiKey::new(self.key.expose_secret())?,
        })
    }
}

/// Hub settings that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedSettings {
    location_name: LocationName,
    location: LocationId,
    key: ApiKey,
}

impl ValidatedSettings {
    /// Display name of the location
    #[must_use]
    pub const fn location_name(&self) -> &LocationName {
        &self.location_name
    }

    /// QWeather location id
    #[must_use]
    pub const fn location(&self) -> &LocationId {
        &self.location
    }

    /// QWeather API key
    #[must_use]
    pub const fn key(&self) -> &ApiKey {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef";

    fn field_errors(settings: &HubSettings) -> FieldErrors {
        match settings.validate() {
            Err(ApplicationError::InvalidSettings(errors)) => errors,
            other => panic!("expected InvalidSettings, got {other:?}"),
        }
    }

    #[test]
    fn valid_settings_pass() {
        let validated = HubSettings::new("home", "101010100", KEY).validate().unwrap();
        assert_eq!(validated.location_name().as_str(), "home");
        assert_eq!(validated.location().as_str(), "101010100");
        assert_eq!(validated.key().expose(), KEY);
    }

    #[test]
    fn short_key_is_invalid_key() {
        let errors = field_errors(&HubSettings::new("home", "101010100", "abc"));
        assert_eq!(errors.get("key"), Some("invalid_key"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn key_length_counts_characters() {
        let key = "天".repeat(32);
        assert!(HubSettings::new("home", "101010100", key).validate().is_ok());
    }

    #[test]
    fn non_digit_location_is_invalid_location() {
        let errors = field_errors(&HubSettings::new("home", "beijing", KEY));
        assert_eq!(errors.get("location"), Some("invalid_location"));
    }

    #[test]
    fn empty_location_is_invalid_location() {
        let errors = field_errors(&HubSettings::new("home", "", KEY));
        assert_eq!(errors.get("location"), Some("invalid_location"));
    }

    #[test]
    fn empty_name_is_invalid_name() {
        let errors = field_errors(&HubSettings::new("", "101010100", KEY));
        assert_eq!(errors.get("location_name"), Some("invalid_name"));
    }

    #[test]
    fn bad_key_is_reported_alongside_derived_field_errors() {
        let errors = field_errors(&HubSettings::new("home", "abc", ""));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("location"), Some("invalid_location"));
        assert_eq!(errors.get("key"), Some("invalid_key"));
    }

    #[test]
    fn all_failing_fields_are_reported() {
        let errors = field_errors(&HubSettings::new("", "abc", "short"));
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("location_name"), Some("invalid_name"));
        assert_eq!(errors.get("location"), Some("invalid_location"));
        assert_eq!(errors.get("key"), Some("invalid_key"));
    }

    #[test]
    fn debug_redacts_key() {
        let settings = HubSettings::new("home", "101010100", KEY);
        let debug = format!("{settings:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(KEY));

        let validated = settings.validate().unwrap();
        assert!(!format!("{validated:?}").contains(KEY));
    }

    #[test]
    fn key_is_not_serialized() {
        let json = serde_json::to_string(&HubSettings::new("home", "101010100", KEY)).unwrap();
        assert!(!json.contains(KEY));
        assert!(json.contains("101010100"));
    }

    #[test]
    fn missing_fields_deserialize_and_fail_validation() {
        let settings: HubSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(field_errors(&settings).len(), 3);
    }

    mod proptests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn digit_locations_are_accepted(location in "[0-9]{1,12}") {
                prop_assert!(HubSettings::new("home", location, KEY).validate().is_ok());
            }

            #[test]
            fn wrong_length_keys_are_rejected(
                key in "[a-f0-9]{0,64}".prop_filter("must not be 32 long", |k| k.len() != 32)
            ) {
                let errors = field_errors(&HubSettings::new("home", "101010100", key));
                prop_assert_eq!(errors.get("key"), Some("invalid_key"));
                prop_assert_eq!(errors.len(), 1);
            }
        }
    }
}
