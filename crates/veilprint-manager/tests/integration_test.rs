//! Integration tests for the fingerprint manager
//!
//! Tests the complete flow from identity to stored profile, injection
//! script and launch flags, including persistence across store reopens.

use std::collections::HashSet;
use tempfile::TempDir;
use veilprint_core::{FingerprintError, Identity};
use veilprint_gen::validator;
use veilprint_manager::FingerprintManager;
use veilprint_store::ProfileStore;

/// Create a manager over a fresh temporary store.
fn create_test_manager() -> (TempDir, FingerprintManager) {
    let dir = TempDir::new().expect("create temp dir");
    let store = ProfileStore::new(dir.path()).expect("open store");
    (dir, FingerprintManager::new(store))
}

#[test]
fn test_profile_is_stable_across_reopens() {
    let dir = TempDir::new().expect("create temp dir");

    let first = {
        let store = ProfileStore::new(dir.path()).expect("open store");
        let manager = FingerprintManager::new(store);
        manager.get_profile("user001").expect("get profile").profile
    };

    // A fresh manager over the same directory must serve the identical
    // profile from disk, created_at included.
    let store = ProfileStore::new(dir.path()).expect("reopen store");
    let manager = FingerprintManager::new(store);
    let second = manager.get_profile("user001").expect("get profile").profile;

    assert_eq!(first, second);
}

#[test]
fn test_distinct_identities_get_distinct_fingerprints() {
    let (_dir, manager) = create_test_manager();

    let a = manager.get_profile("user001").expect("get profile").profile;
    let b = manager.get_profile("user002").expect("get profile").profile;

    assert_ne!(a.canvas.seed, b.canvas.seed);
}

#[test]
fn test_population_diversity_and_consistency() {
    let (_dir, manager) = create_test_manager();

    let mut quadruples = HashSet::new();
    for i in 0..1000 {
        let profile = manager
            .get_profile(&format!("member{i:04}"))
            .expect("get profile")
            .profile;

        // Every generated profile must be internally consistent.
        let violations = validator::check(&profile);
        assert!(violations.is_empty(), "member{i:04}: {violations:?}");
        assert!(profile.display.viewport_width <= profile.display.screen_width);
        assert!(profile.display.viewport_height <= profile.display.screen_height);

        quadruples.insert((
            profile.browser.user_agent,
            (
                profile.display.screen_width,
                profile.display.screen_height,
                profile.display.viewport_width,
                profile.display.viewport_height,
            ),
            profile.locale.timezone,
            profile.graphics.renderer,
        ));
    }

    // The weighted pools give roughly four million distinct quadruples,
    // so 1,000 identities admit at most a stray birthday coincidence.
    assert!(
        quadruples.len() >= 998,
        "population collapsed onto {} fingerprints",
        quadruples.len()
    );
}

#[test]
fn test_script_and_flags_describe_the_stored_profile() {
    let (_dir, manager) = create_test_manager();

    let profile = manager.get_profile("user001").expect("get profile").profile;
    let script = manager.injection_script("user001").expect("compile script");
    let flags = manager.launch_flags("user001").expect("compile flags");

    // The script echoes the stored values, not freshly drawn ones.
    assert!(script.as_str().contains(&profile.browser.user_agent));
    assert!(script.as_str().contains(&format!(
        "defineGetter(navigator, 'hardwareConcurrency', {})",
        profile.browser.hardware_concurrency
    )));
    assert!(script.as_str().contains(&profile.graphics.renderer));

    // Both launch surfaces agree on the user agent.
    let ua_flag = flags
        .iter()
        .find(|f| f.key == "user-agent")
        .expect("user-agent flag");
    assert_eq!(ua_flag.value.as_deref(), Some(profile.browser.user_agent.as_str()));
}

#[test]
fn test_export_import_roundtrip() {
    let (_dir, manager) = create_test_manager();

    let original = manager.get_profile("user001").expect("get profile").profile;
    let exported = manager.export_profile("user001").expect("export profile");

    let imported = manager
        .import_profile("restored", &exported)
        .expect("import profile");

    // Identity is re-keyed and created_at refreshed; everything else is
    // carried over verbatim.
    assert_eq!(imported.identity.as_str(), "restored");
    assert_eq!(imported.browser, original.browser);
    assert_eq!(imported.display, original.display);
    assert_eq!(imported.locale, original.locale);
    assert_eq!(imported.graphics, original.graphics);
    assert_eq!(imported.canvas, original.canvas);
    assert_eq!(imported.fonts, original.fonts);
    assert_eq!(imported.plugins, original.plugins);
    assert_eq!(imported.media_devices, original.media_devices);
    assert_eq!(imported.network, original.network);

    // The imported profile is persisted and retrievable.
    let back = manager.get_profile("restored").expect("get profile").profile;
    assert_eq!(back, imported);
}

#[test]
fn test_import_rejects_tampered_record() {
    let (_dir, manager) = create_test_manager();

    manager.get_profile("user001").expect("get profile");
    let exported = manager.export_profile("user001").expect("export profile");

    // Swap the timezone without touching the offset; the inconsistency
    // must be caught before anything is stored.
    let tampered = exported.replace(
        &format!(
            "\"timezone\": \"{}\"",
            manager
                .get_profile("user001")
                .expect("get profile")
                .profile
                .locale
                .timezone
        ),
        "\"timezone\": \"Antarctica/Troll\"",
    );
    assert_ne!(tampered, exported);

    let result = manager.import_profile("tampered", &tampered);
    assert!(matches!(
        result,
        Err(FingerprintError::ValidationFailed { .. })
    ));
    assert!(matches!(
        manager.export_profile("tampered"),
        Err(FingerprintError::NotFound { .. })
    ));
}

#[test]
fn test_clone_is_isolated_from_source() {
    let (_dir, manager) = create_test_manager();

    let source = manager.get_profile("user001").expect("get profile").profile;
    let clone = manager
        .clone_profile("user001", "user001-staging")
        .expect("clone profile");

    assert_eq!(clone.identity.as_str(), "user001-staging");
    assert_eq!(clone.browser, source.browser);

    // Mutating the clone must not leak back into the source.
    let mut modified = clone.clone();
    modified.battery.level = 0.11;
    manager
        .create_custom_profile(&modified)
        .expect("store modified clone");

    let source_again = manager.get_profile("user001").expect("get profile").profile;
    assert_eq!(source_again.battery, source.battery);
}

#[test]
fn test_delete_then_regenerate_same_fingerprint() {
    let (_dir, manager) = create_test_manager();

    let before = manager.get_profile("user001").expect("get profile").profile;
    manager.delete_profile("user001").expect("delete profile");

    // Regeneration is seeded by the identity, so the fingerprint comes
    // back identical apart from the new creation time.
    let after = manager.get_profile("user001").expect("get profile").profile;
    assert_eq!(before.browser, after.browser);
    assert_eq!(before.canvas, after.canvas);
    assert_ne!(before.created_at, after.created_at);
}

#[test]
fn test_batch_generation_and_stats() {
    let (_dir, manager) = create_test_manager();

    let identities: Vec<String> = (0..50).map(|i| format!("batch{i:02}")).collect();
    let refs: Vec<&str> = identities.iter().map(String::as_str).collect();

    let report = manager.generate_batch(&refs);
    assert!(report.is_complete(), "failures: {:?}", report.failed);
    assert_eq!(report.succeeded.len(), 50);

    let stats = manager.stats().expect("compute stats");
    assert_eq!(stats.total, 50);
    assert_eq!(stats.by_platform.values().sum::<usize>(), 50);

    let listed = manager.list_profiles().expect("list profiles");
    assert_eq!(listed.len(), 50);
    assert!(listed.contains(&Identity::new("batch00").expect("valid identity")));
}
