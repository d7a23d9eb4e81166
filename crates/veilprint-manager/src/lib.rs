//! Veilprint Manager - High-level facade over the fingerprint engine.
//!
//! The [`FingerprintManager`] is the one entry point callers need: it owns
//! the store, drives get-or-create, and compiles injection scripts and
//! launch flags from stored profiles so both launch surfaces always agree.
//!
//! # Example
//!
//! ```rust,no_run
//! use veilprint_manager::FingerprintManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = FingerprintManager::open_default()?;
//!
//! let retrieved = manager.get_profile("user001")?;
//! println!("{}", retrieved.profile.browser.user_agent);
//!
//! let script = manager.injection_script("user001")?;
//! let flags = manager.launch_flags("user001")?;
//! println!("{} bytes of script, {} flags", script.len(), flags.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod manager;

pub use manager::{BatchReport, FingerprintManager};
