//! Configuration management for the profile store.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Store configuration.
///
/// Loaded from `~/.config/veilprint/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory holding one JSON record per identity
    pub profiles_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            profiles_dir: Self::default_profiles_dir(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or is not valid
    /// TOML.
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports:
    /// - `VEILPRINT_PROFILES_DIR`: override the profiles root directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(dir) = std::env::var("VEILPRINT_PROFILES_DIR") {
            if !dir.is_empty() {
                tracing::debug!("Override profiles_dir from env: {}", dir);
                config.profiles_dir = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/veilprint/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("io", "veilprint", "veilprint").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Default profiles root under the XDG data directory, with a relative
    /// fallback when the base directories are unavailable.
    fn default_profiles_dir() -> PathBuf {
        ProjectDirs::from("io", "veilprint", "veilprint")
            .map(|dirs| dirs.data_dir().join("profiles"))
            .unwrap_or_else(|| PathBuf::from("veilprint-profiles"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_profiles_dir() {
        let config = StoreConfig::default();
        assert!(!config.profiles_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = StoreConfig {
            profiles_dir: PathBuf::from("/tmp/veilprint-test/profiles"),
        };
        let toml_str = toml::to_string_pretty(&config).expect("serialize config");
        let back: StoreConfig = toml::from_str(&toml_str).expect("deserialize config");
        assert_eq!(back.profiles_dir, config.profiles_dir);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: StoreConfig = toml::from_str("").expect("deserialize empty config");
        assert_eq!(config.profiles_dir, StoreConfig::default().profiles_dir);
    }
}
