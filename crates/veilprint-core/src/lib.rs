//! Veilprint Core - Foundation crate for the fingerprint engine.
//!
//! This crate provides the shared data model, error handling and
//! configuration that all other Veilprint crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`types`] - Shared newtypes (`Identity`, `Timestamp`)
//! - [`profile`] - The `FingerprintProfile` data model and on-disk record
//! - [`config`] - TOML-based store configuration with XDG paths
//!
//! # Example
//!
//! ```rust
//! use veilprint_core::{Identity, StoreConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::new("user001")?;
//! println!("profile key: {identity}");
//!
//! let config = StoreConfig::default();
//! println!("records under: {}", config.profiles_dir.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod profile;
pub mod types;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{ConfigError, ConfigResult, FingerprintError, Result};
pub use profile::{
    AudioProfile, BatteryProfile, BrowserIdentity, CanvasNoiseProfile, Display,
    FingerprintProfile, FontProfile, GraphicsProfile, LocaleProfile, MediaDevice,
    NetworkProfileStub, ProfileRecord, GENERATOR_VERSION,
};
pub use types::{Identity, Timestamp};
