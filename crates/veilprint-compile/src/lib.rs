//! Veilprint Compile - Profile-to-browser compilation.
//!
//! Two compilers over one validated profile:
//!
//! - [`script`] - A self-contained JavaScript IIFE injected before page
//!   scripts, overriding what page JS can observe
//! - [`flags`] - Browser command-line switches for what a script cannot
//!   reach (window size, Accept-Language, automation tells)
//!
//! Both refuse profiles that fail consistency validation.
//!
//! # Example
//!
//! ```rust
//! use veilprint_core::Identity;
//! use veilprint_gen::generate;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = generate(&Identity::new("user001")?);
//! let script = veilprint_compile::compile_script(&profile)?;
//! let flags = veilprint_compile::compile_flags(&profile)?;
//! assert!(script.as_str().contains(&profile.browser.user_agent));
//! assert!(!flags.is_empty());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod flags;
pub mod script;

pub use flags::{compile as compile_flags, merge as merge_flags, LaunchFlag};
pub use script::{compile as compile_script, InjectionScript};
