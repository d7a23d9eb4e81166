//! Launch flag compilation.
//!
//! Flags cover what an injected script cannot reach: the real window size,
//! the Accept-Language header, the network-level user agent and the
//! automation tells baked into the browser binary. The compiler emits only
//! switches the browser actually understands; anything a flag cannot
//! influence (TLS and HTTP/2 behavior included) is simply not emitted.

use tracing::debug;
use veilprint_core::{FingerprintProfile, Result};
use veilprint_gen::validate;

/// One command-line switch, split into key and optional value.
///
/// Keys are stored without the leading `--`; duplicate detection during
/// merging compares keys only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchFlag {
    /// Switch name without the leading dashes
    pub key: String,
    /// Value after `=`, if the switch takes one
    pub value: Option<String>,
}

impl LaunchFlag {
    /// A bare switch with no value.
    #[must_use]
    pub fn bare(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// A `--key=value` switch.
    #[must_use]
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    /// Parse a raw argument like `--window-size=800,600`.
    ///
    /// Leading dashes are optional; everything after the first `=` is the
    /// value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim_start_matches('-');
        match trimmed.split_once('=') {
            Some((key, value)) => Self::with_value(key, value),
            None => Self::bare(trimmed),
        }
    }

    /// Render as the argument string handed to the browser.
    #[must_use]
    pub fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("--{}={}", self.key, value),
            None => format!("--{}", self.key),
        }
    }
}

impl std::fmt::Display for LaunchFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Switches that suppress the browser's own automation tells. Emitted for
/// every profile, independent of its values.
const AUTOMATION_SUPPRESSION_FLAGS: &[(&str, Option<&str>)] = &[
    ("disable-blink-features", Some("AutomationControlled")),
    ("exclude-switches", Some("enable-automation")),
    ("no-first-run", None),
    ("no-default-browser-check", None),
    ("disable-infobars", None),
    ("mute-audio", None),
];

/// Compile the launch flag set for a profile.
///
/// Profile-derived flags come first, the fixed automation-suppression set
/// after. The window size uses the viewport, not the screen: the screen
/// dimensions are what the injected script reports, while the window is the
/// surface the browser actually renders into.
pub fn compile(profile: &FingerprintProfile) -> Result<Vec<LaunchFlag>> {
    validate(profile)?;

    let mut flags = vec![
        LaunchFlag::with_value(
            "window-size",
            format!(
                "{},{}",
                profile.display.viewport_width, profile.display.viewport_height
            ),
        ),
        LaunchFlag::with_value(
            "force-device-scale-factor",
            profile.display.device_pixel_ratio.to_string(),
        ),
        LaunchFlag::with_value("lang", &profile.browser.language),
        LaunchFlag::with_value("accept-lang", profile.browser.languages.join(",")),
        LaunchFlag::with_value("user-agent", &profile.browser.user_agent),
    ];

    for &(key, value) in AUTOMATION_SUPPRESSION_FLAGS {
        flags.push(match value {
            Some(value) => LaunchFlag::with_value(key, value),
            None => LaunchFlag::bare(key),
        });
    }

    debug!(identity = %profile.identity, count = flags.len(), "Compiled launch flags");
    Ok(flags)
}

/// Merge two flag sets, deduplicating by key.
///
/// Primary flags win: a secondary flag whose key already appears in the
/// primary set is dropped. Order is preserved, primary first.
#[must_use]
pub fn merge(primary: &[LaunchFlag], secondary: &[LaunchFlag]) -> Vec<LaunchFlag> {
    let mut merged: Vec<LaunchFlag> = primary.to_vec();
    for flag in secondary {
        if !merged.iter().any(|f| f.key == flag.key) {
            merged.push(flag.clone());
        }
    }
    merged
}

/// Render a flag set into the argument strings handed to the browser.
#[must_use]
pub fn render(flags: &[LaunchFlag]) -> Vec<String> {
    flags.iter().map(LaunchFlag::render).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use veilprint_core::Identity;
    use veilprint_gen::generate;

    fn profile() -> FingerprintProfile {
        generate(&Identity::new("flags-test").expect("valid identity"))
    }

    #[test]
    fn test_window_size_uses_viewport() {
        let profile = profile();
        let flags = compile(&profile).expect("compile flags");
        let window_size = flags
            .iter()
            .find(|f| f.key == "window-size")
            .expect("window-size flag");
        assert_eq!(
            window_size.value.as_deref(),
            Some(
                format!(
                    "{},{}",
                    profile.display.viewport_width, profile.display.viewport_height
                )
                .as_str()
            )
        );
    }

    #[test]
    fn test_automation_suppression_always_present() {
        let flags = compile(&profile()).expect("compile flags");
        let rendered = render(&flags);
        assert!(rendered.contains(&"--disable-blink-features=AutomationControlled".to_string()));
        assert!(rendered.contains(&"--no-first-run".to_string()));
    }

    #[test]
    fn test_no_network_pseudo_flags() {
        let flags = compile(&profile()).expect("compile flags");
        // TLS/HTTP2 identity cannot be set from the command line; the
        // compiler must not invent switches for it.
        assert!(!flags.iter().any(|f| f.key.contains("ja3")
            || f.key.contains("ja4")
            || f.key.contains("tls")
            || f.key.contains("http2")));
    }

    #[test]
    fn test_keys_are_unique() {
        let flags = compile(&profile()).expect("compile flags");
        let mut keys: Vec<&str> = flags.iter().map(|f| f.key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), flags.len());
    }

    #[test]
    fn test_merge_primary_wins() {
        let primary = vec![LaunchFlag::with_value("window-size", "800,600")];
        let secondary = vec![
            LaunchFlag::with_value("window-size", "1024,768"),
            LaunchFlag::bare("headless"),
        ];

        let merged = merge(&primary, &secondary);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].value.as_deref(), Some("800,600"));
        assert_eq!(merged[1].key, "headless");
    }

    #[test]
    fn test_parse_roundtrip() {
        let flag = LaunchFlag::parse("--window-size=800,600");
        assert_eq!(flag.key, "window-size");
        assert_eq!(flag.value.as_deref(), Some("800,600"));
        assert_eq!(flag.render(), "--window-size=800,600");

        let bare = LaunchFlag::parse("--mute-audio");
        assert_eq!(bare.key, "mute-audio");
        assert_eq!(bare.value, None);
        assert_eq!(bare.render(), "--mute-audio");
    }

    #[test]
    fn test_inconsistent_profile_is_refused() {
        let mut profile = profile();
        profile.locale.utc_offset_minutes += 60;
        assert!(compile(&profile).is_err());
    }
}
