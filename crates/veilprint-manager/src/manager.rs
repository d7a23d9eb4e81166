//! The high-level fingerprint manager.
//!
//! One object tying the store and the two compilers together. Callers hand
//! in raw identity strings; the manager validates them, drives get-or-create
//! through the store, and compiles injection scripts and launch flags from
//! the stored profile so both always describe the same fingerprint.

use tracing::{info, warn};
use veilprint_compile::{InjectionScript, LaunchFlag};
use veilprint_core::{
    FingerprintError, FingerprintProfile, Identity, ProfileRecord, Result, Timestamp,
};
use veilprint_store::{ProfileStore, Retrieved, StoreStats};

/// Outcome of a batch generation run.
///
/// Batch runs are partial-success: one bad identity does not abort the rest.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Identities whose profiles were retrieved or generated
    pub succeeded: Vec<Identity>,
    /// Inputs that failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    /// Whether every input succeeded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Facade over the profile store and the compilers.
///
/// Cheap to clone; clones share the underlying store.
#[derive(Clone)]
pub struct FingerprintManager {
    store: ProfileStore,
}

impl FingerprintManager {
    /// Build a manager over an existing store.
    #[must_use]
    pub fn new(store: ProfileStore) -> Self {
        Self { store }
    }

    /// Build a manager over the default store location.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(ProfileStore::open_default()?))
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Get the profile for an identity, generating it on first request.
    pub fn get_profile(&self, identity: &str) -> Result<Retrieved> {
        let identity = Identity::new(identity)?;
        self.store.get(&identity)
    }

    /// Store a caller-assembled profile, replacing any existing one.
    ///
    /// The profile must pass consistency validation; the manager never
    /// stores a fingerprint it would refuse to compile.
    pub fn create_custom_profile(&self, profile: &FingerprintProfile) -> Result<()> {
        self.store.put(profile)?;
        info!(identity = %profile.identity, "Stored custom profile");
        Ok(())
    }

    /// Copy an existing profile to a new identity.
    ///
    /// The clone gets its own `created_at` and is persisted independently;
    /// later changes to either side never affect the other. Errors with
    /// `NotFound` if the source has no profile; cloning never generates.
    pub fn clone_profile(&self, source: &str, target: &str) -> Result<FingerprintProfile> {
        let source = Identity::new(source)?;
        let target = Identity::new(target)?;

        let mut profile = self
            .store
            .peek(&source)?
            .ok_or_else(|| FingerprintError::NotFound {
                identity: source.to_string(),
            })?;

        profile.identity = target.clone();
        profile.created_at = Timestamp::now();
        self.store.put(&profile)?;

        info!(source = %source, target = %target, "Cloned profile");
        Ok(profile)
    }

    /// Export the stored profile as a pretty-printed JSON record.
    ///
    /// Errors with `NotFound` for an unknown identity; exporting never
    /// generates.
    pub fn export_profile(&self, identity: &str) -> Result<String> {
        let identity = Identity::new(identity)?;
        let profile = self
            .store
            .peek(&identity)?
            .ok_or_else(|| FingerprintError::NotFound {
                identity: identity.to_string(),
            })?;

        serde_json::to_string_pretty(&ProfileRecord::new(profile))
            .map_err(|e| FingerprintError::Serialization(e.to_string()))
    }

    /// Import a previously exported record under the given identity.
    ///
    /// The record is re-keyed to the target identity and gets a fresh
    /// `created_at`; the imported fingerprint values must pass consistency
    /// validation before anything is stored.
    pub fn import_profile(&self, identity: &str, json: &str) -> Result<FingerprintProfile> {
        let identity = Identity::new(identity)?;
        let record: ProfileRecord = serde_json::from_str(json)
            .map_err(|e| FingerprintError::Serialization(format!("invalid profile record: {e}")))?;

        let mut profile = record.profile;
        profile.identity = identity.clone();
        profile.created_at = Timestamp::now();
        self.store.put(&profile)?;

        info!(identity = %identity, "Imported profile");
        Ok(profile)
    }

    /// Delete the profile for an identity.
    pub fn delete_profile(&self, identity: &str) -> Result<()> {
        let identity = Identity::new(identity)?;
        self.store.delete(&identity)
    }

    /// List every identity with a profile, sorted.
    pub fn list_profiles(&self) -> Result<Vec<Identity>> {
        self.store.list()
    }

    /// Aggregate statistics over the stored population.
    pub fn stats(&self) -> Result<StoreStats> {
        self.store.stats()
    }

    /// Ensure profiles exist for a batch of identities.
    ///
    /// Invalid identities and individual failures are collected in the
    /// report; the rest of the batch proceeds.
    pub fn generate_batch(&self, identities: &[&str]) -> BatchReport {
        let mut report = BatchReport::default();

        for raw in identities {
            match self.get_profile(raw) {
                Ok(retrieved) => report.succeeded.push(retrieved.profile.identity),
                Err(e) => {
                    warn!(identity = raw, error = %e, "Batch entry failed");
                    report.failed.push(((*raw).to_string(), e.to_string()));
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Batch generation finished"
        );
        report
    }

    /// Compile the injection script for an identity's stored profile,
    /// generating the profile first if needed.
    pub fn injection_script(&self, identity: &str) -> Result<InjectionScript> {
        let retrieved = self.get_profile(identity)?;
        veilprint_compile::compile_script(&retrieved.profile)
    }

    /// Compile the launch flags for an identity's stored profile, generating
    /// the profile first if needed.
    pub fn launch_flags(&self, identity: &str) -> Result<Vec<LaunchFlag>> {
        let retrieved = self.get_profile(identity)?;
        veilprint_compile::compile_flags(&retrieved.profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_manager() -> (TempDir, FingerprintManager) {
        let dir = TempDir::new().expect("create temp dir");
        let store = ProfileStore::new(dir.path()).expect("open store");
        (dir, FingerprintManager::new(store))
    }

    #[test]
    fn test_get_profile_rejects_invalid_identity() {
        let (_dir, manager) = temp_manager();
        let result = manager.get_profile("../escape");
        assert!(matches!(result, Err(FingerprintError::InvalidIdentity(_))));
    }

    #[test]
    fn test_clone_requires_existing_source() {
        let (_dir, manager) = temp_manager();
        let result = manager.clone_profile("ghost", "copy");
        assert!(matches!(result, Err(FingerprintError::NotFound { .. })));
        // The failed clone must not have created either profile.
        assert!(manager.list_profiles().expect("list").is_empty());
    }

    #[test]
    fn test_export_requires_existing_profile() {
        let (_dir, manager) = temp_manager();
        let result = manager.export_profile("ghost");
        assert!(matches!(result, Err(FingerprintError::NotFound { .. })));
    }

    #[test]
    fn test_batch_is_partial_success() {
        let (_dir, manager) = temp_manager();
        let report = manager.generate_batch(&["user001", "bad identity", "user002"]);
        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].0, "bad identity");
    }

    #[test]
    fn test_import_rejects_garbage() {
        let (_dir, manager) = temp_manager();
        let result = manager.import_profile("user001", "{ not a record");
        assert!(matches!(result, Err(FingerprintError::Serialization(_))));
    }
}
