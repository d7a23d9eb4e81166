//! Veilprint Store - Persisted per-identity profile storage.
//!
//! One JSON record per identity under a root directory, fronted by an
//! in-memory cache. The store owns the get-or-create semantics: the first
//! request for an identity generates its profile, and every later request
//! returns the stored copy unchanged, whatever has happened to the
//! generation pools since.
//!
//! # Example
//!
//! ```rust,no_run
//! use veilprint_core::Identity;
//! use veilprint_store::ProfileStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ProfileStore::open_default()?;
//! let identity = Identity::new("user001")?;
//! let retrieved = store.get(&identity)?;
//! println!("{}", retrieved.profile.browser.user_agent);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod store;

pub use store::{ProfileStore, Retrieved, StoreStats, StoreWarning};
