//! Veilprint Gen - Deterministic fingerprint generation and validation.
//!
//! The generator maps an identity key to a complete, internally consistent
//! [`FingerprintProfile`](veilprint_core::FingerprintProfile): the identity
//! is hashed to a seed, and all fields are drawn from a single seeded stream
//! over curated pools of real-world values.
//!
//! # Modules
//!
//! - [`pools`] - Curated selection pools (platforms, screens, locales, GPUs)
//! - [`generator`] - Seeded single-stream profile generation
//! - [`validator`] - Cross-field consistency checks
//!
//! # Example
//!
//! ```rust
//! use veilprint_core::Identity;
//! use veilprint_gen::{generate, validate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let identity = Identity::new("user001")?;
//! let profile = generate(&identity);
//! validate(&profile)?;
//! assert_eq!(profile, {
//!     let mut again = generate(&identity);
//!     again.created_at = profile.created_at;
//!     again
//! });
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod generator;
pub mod pools;
pub mod validator;

pub use generator::{generate, identity_seed};
pub use pools::Platform;
pub use validator::{check, validate};
