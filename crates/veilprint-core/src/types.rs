//! Shared newtypes used across the Veilprint crates.

use crate::error::FingerprintError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for identity keys with validation.
///
/// An identity is the caller-supplied stable key a fingerprint profile is
/// keyed on (an account or user id). It is never generated internally. Keys
/// double as record file names, so the accepted charset is filesystem-safe:
/// alphanumerics plus `.`, `_`, `@` and `-`, 1-128 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Create a new `Identity` from a string.
    ///
    /// # Errors
    /// Returns `InvalidIdentity` if the key is empty, too long, or contains
    /// characters that are unsafe as a file name.
    pub fn new(id: impl Into<String>) -> Result<Self, FingerprintError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(id: &str) -> Result<(), FingerprintError> {
        static IDENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = IDENTITY_REGEX
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._@-]*$").expect("valid regex"));

        if id.is_empty() {
            return Err(FingerprintError::InvalidIdentity(
                "identity must not be empty".to_string(),
            ));
        }

        if id.len() > 128 {
            return Err(FingerprintError::InvalidIdentity(format!(
                "identity must be at most 128 characters, got {}",
                id.len()
            )));
        }

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(FingerprintError::InvalidIdentity(format!(
                "identity must be alphanumeric with '.', '_', '@' or '-', got '{id}'"
            )))
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Get the inner `DateTime<Utc>`.
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp from an RFC3339 string.
    pub fn from_rfc3339(s: &str) -> Result<Self, FingerprintError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| FingerprintError::Serialization(format!("invalid timestamp: {e}")))
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Get seconds since Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}
