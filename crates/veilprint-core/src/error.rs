//! Central error types for the Veilprint engine.
//!
//! One error enum covers the whole subsystem so callers match on a single
//! taxonomy. Persistence degradation is deliberately *not* an error variant:
//! a usable profile with a failed write is a successful call carrying a
//! warning (see `veilprint-store`).

use thiserror::Error;

/// Central error type for all fingerprint operations.
#[derive(Error, Debug)]
pub enum FingerprintError {
    /// The caller-supplied identity key is empty or malformed.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// A profile violates one or more consistency invariants.
    ///
    /// Returned for customize/import operations; never silently coerced.
    #[error("profile validation failed: {}", violations.join("; "))]
    ValidationFailed {
        /// Human-readable description of each violated invariant
        violations: Vec<String>,
    },

    /// No profile exists for the identity (delete/export/clone source).
    #[error("no profile found for identity '{identity}'")]
    NotFound {
        /// The identity that was looked up
        identity: String,
    },

    /// Profile record serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration errors (file loading, parsing, path resolution)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors from the record store
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal invariant breach (a generated profile failed validation)
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `FingerprintError`.
pub type Result<T> = std::result::Result<T, FingerprintError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FingerprintError::InvalidIdentity("identity must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "invalid identity: identity must not be empty"
        );

        let err = FingerprintError::NotFound {
            identity: "user001".to_string(),
        };
        assert!(err.to_string().contains("user001"));
    }

    #[test]
    fn test_validation_failed_joins_violations() {
        let err = FingerprintError::ValidationFailed {
            violations: vec![
                "viewport width exceeds screen width".to_string(),
                "unknown graphics tuple".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("viewport width exceeds screen width"));
        assert!(msg.contains("unknown graphics tuple"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: FingerprintError = io_err.into();
        assert!(matches!(err, FingerprintError::Io(_)));
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let err: FingerprintError = config_err.into();
        assert!(matches!(err, FingerprintError::Config(_)));
    }
}
