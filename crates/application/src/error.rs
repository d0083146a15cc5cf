//! Application-level errors

use std::{collections::BTreeMap, fmt};

use domain::DomainError;
use thiserror::Error;

/// Field-level validation failures, keyed by settings field name
///
/// Values are stable error codes (`invalid_key`, `invalid_location`,
/// `invalid_name`) suitable for display next to the offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    /// Create an empty error set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code` for `field`, keeping the first code per field
    pub fn insert(&mut self, field: impl Into<String>, code: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| code.into());
    }

    /// Error code recorded for `field`
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether no field failed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate `(field, code)` pairs in field name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, code) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {code}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Self::new();
        for (field, errs) in errors.field_errors() {
            if let Some(err) = errs.first() {
                fields.insert(field.to_string(), err.code.to_string());
            }
        }
        fields
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// External service error
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Provider payload did not have the expected shape
    #[error("Unexpected data shape: {0}")]
    DataShape(String),

    /// Hub settings failed validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(FieldErrors),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}
