//! Persisted per-identity profile store.
//!
//! One pretty-printed JSON record per identity under a root directory, with
//! an in-memory cache in front. `get` is the get-or-create primitive: the
//! first request for an identity generates its profile, persists it, and
//! every later request returns the stored copy unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, warn};
use veilprint_core::{
    FingerprintError, FingerprintProfile, Identity, ProfileRecord, Result, StoreConfig,
    GENERATOR_VERSION,
};
use veilprint_gen::{generate, validate};

/// A non-fatal condition attached to a successful retrieval.
///
/// Degraded persistence and record repair are reported this way rather than
/// as errors: the caller still gets a usable profile, but should know the
/// store could not do its full job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWarning {
    /// The profile was generated but could not be written to disk. It lives
    /// in the cache only and will be regenerated (identically) next run.
    PersistenceDegraded {
        /// The underlying write failure
        detail: String,
    },
    /// The on-disk record was unreadable and has been regenerated from the
    /// identity's seed.
    RepairedCorruptRecord,
    /// The record was written by a different generator version. The stored
    /// profile is returned unchanged; nothing is regenerated.
    GeneratorVersionDrift {
        /// Version tag found in the record
        stored: u32,
    },
}

/// A successful retrieval: the profile plus any non-fatal warning.
#[derive(Debug, Clone, PartialEq)]
pub struct Retrieved {
    /// The stored or freshly generated profile
    pub profile: FingerprintProfile,
    /// Non-fatal condition encountered while retrieving, if any
    pub warning: Option<StoreWarning>,
}

/// Aggregate statistics over the stored population.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StoreStats {
    /// Number of identities with a profile
    pub total: usize,
    /// Number of profiles currently held in the in-memory cache
    pub cached: usize,
    /// Profile count per `navigator.platform` label
    pub by_platform: HashMap<String, usize>,
    /// Profile count per primary language
    pub by_language: HashMap<String, usize>,
    /// Profile count per timezone
    pub by_timezone: HashMap<String, usize>,
}

/// Disk-backed profile store with an in-memory cache.
///
/// Cheap to clone; clones share the cache and the per-identity locks.
#[derive(Clone)]
pub struct ProfileStore {
    root: PathBuf,
    cache: Arc<RwLock<HashMap<Identity, FingerprintProfile>>>,
    /// Per-identity generation locks so concurrent first requests for the
    /// same identity produce exactly one record.
    locks: Arc<Mutex<HashMap<Identity, Arc<Mutex<()>>>>>,
}

impl ProfileStore {
    /// Open a store rooted at the given directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "Opened profile store");
        Ok(Self {
            root,
            cache: Arc::new(RwLock::new(HashMap::new())),
            locks: Arc::new(Mutex::new(HashMap::new())),
        })
    }

    /// Open the store at the configured default location, honoring the
    /// `VEILPRINT_PROFILES_DIR` override.
    pub fn open_default() -> Result<Self> {
        let config = StoreConfig::load_with_env()?;
        Self::new(config.profiles_dir)
    }

    /// The directory holding the JSON records.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the profile for an identity, generating and persisting it on
    /// first request.
    ///
    /// Later requests return the stored profile byte-for-byte, even if the
    /// generation pools have changed since; an identity's fingerprint never
    /// shifts under the caller.
    pub fn get(&self, identity: &Identity) -> Result<Retrieved> {
        if let Some(profile) = self.cached(identity) {
            return Ok(Retrieved {
                profile,
                warning: None,
            });
        }

        // Serialize first-time generation per identity.
        let lock = self.identity_lock(identity);
        let result = {
            let _guard = lock.lock().expect("acquire identity generation lock");
            self.get_or_materialize(identity)
        };
        drop(lock);
        self.release_identity_lock(identity);
        result
    }

    /// The guarded check-load-generate-persist sequence behind `get`.
    fn get_or_materialize(&self, identity: &Identity) -> Result<Retrieved> {
        // Another caller may have finished while we waited.
        if let Some(profile) = self.cached(identity) {
            return Ok(Retrieved {
                profile,
                warning: None,
            });
        }

        let path = self.record_path(identity);
        let mut repair_warning = None;

        if path.exists() {
            match self.load_record(&path) {
                Ok(record) => {
                    let warning = if record.generator_version == GENERATOR_VERSION {
                        None
                    } else {
                        warn!(
                            identity = %identity,
                            stored = record.generator_version,
                            current = GENERATOR_VERSION,
                            "Record written by a different generator version"
                        );
                        Some(StoreWarning::GeneratorVersionDrift {
                            stored: record.generator_version,
                        })
                    };
                    self.insert_cache(record.profile.clone());
                    return Ok(Retrieved {
                        profile: record.profile,
                        warning,
                    });
                }
                Err(e) => {
                    warn!(
                        identity = %identity,
                        error = %e,
                        "Corrupt profile record, regenerating from seed"
                    );
                    repair_warning = Some(StoreWarning::RepairedCorruptRecord);
                }
            }
        }

        let profile = generate(identity);
        if let Err(e) = validate(&profile) {
            tracing::error!(identity = %identity, error = %e, "Generated profile failed validation");
            return Err(FingerprintError::Internal(format!(
                "generated profile for '{identity}' failed validation: {e}"
            )));
        }

        let warning = match self.write_record(identity, &profile) {
            Ok(()) => {
                info!(identity = %identity, "Generated and persisted new profile");
                repair_warning
            }
            Err(e) => {
                warn!(
                    identity = %identity,
                    error = %e,
                    "Profile could not be persisted, serving from cache only"
                );
                Some(StoreWarning::PersistenceDegraded {
                    detail: e.to_string(),
                })
            }
        };

        self.insert_cache(profile.clone());
        Ok(Retrieved { profile, warning })
    }

    /// Store a caller-supplied profile, replacing any existing record.
    ///
    /// The profile must pass consistency validation; persistence failures
    /// here are hard errors since the caller explicitly asked to store.
    pub fn put(&self, profile: &FingerprintProfile) -> Result<()> {
        validate(profile)?;
        self.write_record(&profile.identity, profile)?;
        self.insert_cache(profile.clone());
        debug!(identity = %profile.identity, "Stored profile");
        Ok(())
    }

    /// Look up a profile without generating one.
    ///
    /// Returns `Ok(None)` when no record exists. Unlike `get`, a corrupt
    /// record is an error here, never silently repaired.
    pub fn peek(&self, identity: &Identity) -> Result<Option<FingerprintProfile>> {
        if let Some(profile) = self.cached(identity) {
            return Ok(Some(profile));
        }

        let path = self.record_path(identity);
        if !path.exists() {
            return Ok(None);
        }

        let record = self.load_record(&path)?;
        self.insert_cache(record.profile.clone());
        Ok(Some(record.profile))
    }

    /// Delete the record and cache entry for an identity.
    ///
    /// Errors with `NotFound` if the identity has no profile at all.
    pub fn delete(&self, identity: &Identity) -> Result<()> {
        let cached = self
            .cache
            .write()
            .expect("acquire write lock on cache")
            .remove(identity)
            .is_some();

        let path = self.record_path(identity);
        let on_disk = path.exists();
        if on_disk {
            fs::remove_file(&path)?;
        }

        if cached || on_disk {
            info!(identity = %identity, "Deleted profile");
            Ok(())
        } else {
            Err(FingerprintError::NotFound {
                identity: identity.to_string(),
            })
        }
    }

    /// List every identity with a profile, sorted.
    ///
    /// Covers both persisted records and cache-only entries from degraded
    /// persistence. Files that do not parse as identities are skipped.
    pub fn list(&self) -> Result<Vec<Identity>> {
        let mut identities: Vec<Identity> = self
            .cache
            .read()
            .expect("acquire read lock on cache")
            .keys()
            .cloned()
            .collect();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Ok(identity) = Identity::new(stem) {
                identities.push(identity);
            }
        }

        identities.sort();
        identities.dedup();
        Ok(identities)
    }

    /// Aggregate statistics over every loadable profile.
    ///
    /// Corrupt records are skipped with a warning rather than failing the
    /// whole aggregation.
    pub fn stats(&self) -> Result<StoreStats> {
        let identities = self.list()?;
        let cached = self.cache.read().expect("acquire read lock on cache").len();

        let mut stats = StoreStats {
            total: 0,
            cached,
            by_platform: HashMap::new(),
            by_language: HashMap::new(),
            by_timezone: HashMap::new(),
        };

        for identity in &identities {
            let profile = match self.peek(identity) {
                Ok(Some(profile)) => profile,
                Ok(None) => continue,
                Err(e) => {
                    warn!(identity = %identity, error = %e, "Skipping unreadable record in stats");
                    continue;
                }
            };
            stats.total += 1;
            *stats
                .by_platform
                .entry(profile.browser.platform.clone())
                .or_insert(0) += 1;
            *stats
                .by_language
                .entry(profile.browser.language.clone())
                .or_insert(0) += 1;
            *stats
                .by_timezone
                .entry(profile.locale.timezone.clone())
                .or_insert(0) += 1;
        }

        Ok(stats)
    }

    /// Path of the JSON record for an identity.
    #[must_use]
    pub fn record_path(&self, identity: &Identity) -> PathBuf {
        self.root.join(format!("{identity}.json"))
    }

    fn cached(&self, identity: &Identity) -> Option<FingerprintProfile> {
        self.cache
            .read()
            .expect("acquire read lock on cache")
            .get(identity)
            .cloned()
    }

    fn insert_cache(&self, profile: FingerprintProfile) {
        self.cache
            .write()
            .expect("acquire write lock on cache")
            .insert(profile.identity.clone(), profile);
    }

    fn identity_lock(&self, identity: &Identity) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("acquire identity lock map");
        locks
            .entry(identity.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the map entry once no caller holds the lock anymore, so the
    /// map does not grow with every identity ever requested. A concurrent
    /// caller holding a clone keeps the entry alive; they release it.
    fn release_identity_lock(&self, identity: &Identity) {
        let mut locks = self.locks.lock().expect("acquire identity lock map");
        if let Some(entry) = locks.get(identity) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(identity);
            }
        }
    }

    fn load_record(&self, path: &Path) -> Result<ProfileRecord> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| {
            FingerprintError::Serialization(format!(
                "record {} is not a valid profile: {e}",
                path.display()
            ))
        })
    }

    fn write_record(&self, identity: &Identity, profile: &FingerprintProfile) -> Result<()> {
        let record = ProfileRecord::new(profile.clone());
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| FingerprintError::Serialization(e.to_string()))?;
        fs::write(self.record_path(identity), json)?;
        Ok(())
    }
}
