//! Cross-field consistency validation.
//!
//! A profile is internally consistent when every correlated field group could
//! have come off one real machine. The checks here mirror what fingerprint
//! detectors actually compare: user agent versus platform, viewport versus
//! screen, timezone versus offset, and WebGL tuples against known hardware.
//!
//! Validation runs on generated, imported and custom profiles alike, and the
//! script compiler refuses inconsistent input. A generated profile failing
//! here is an internal bug, not a caller error.

use veilprint_core::{FingerprintError, FingerprintProfile, Result};

use crate::pools::{Platform, AUDIO_PAIRS, LOCALE_PAIRS};

/// Collect every consistency violation in the profile.
///
/// Returns an empty list for a consistent profile. Each entry is a
/// human-readable description naming the offending fields.
#[must_use]
pub fn check(profile: &FingerprintProfile) -> Vec<String> {
    let mut violations = Vec::new();

    check_browser(profile, &mut violations);
    check_display(profile, &mut violations);
    check_locale(profile, &mut violations);
    check_graphics(profile, &mut violations);
    check_audio(profile, &mut violations);
    check_media_surfaces(profile, &mut violations);
    check_noise_and_battery(profile, &mut violations);

    violations
}

/// Validate the profile, failing with `ValidationFailed` on any violation.
pub fn validate(profile: &FingerprintProfile) -> Result<()> {
    let violations = check(profile);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(FingerprintError::ValidationFailed { violations })
    }
}

fn check_browser(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let browser = &profile.browser;

    match Platform::from_label(&browser.platform) {
        Some(platform) => {
            if !browser.user_agent.contains(platform.ua_token()) {
                violations.push(format!(
                    "user agent '{}' does not match platform '{}'",
                    browser.user_agent, browser.platform
                ));
            }
        }
        None => violations.push(format!("unknown platform label '{}'", browser.platform)),
    }

    if browser.languages.is_empty() {
        violations.push("languages list is empty".to_string());
    } else if browser.languages[0] != browser.language {
        violations.push(format!(
            "primary language '{}' is not first in languages {:?}",
            browser.language, browser.languages
        ));
    }

    if !(2..=32).contains(&browser.hardware_concurrency) {
        violations.push(format!(
            "hardware_concurrency {} outside plausible range 2..=32",
            browser.hardware_concurrency
        ));
    }
}

fn check_display(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let d = &profile.display;

    if d.viewport_width == 0 || d.viewport_height == 0 {
        violations.push("viewport has a zero dimension".to_string());
    }
    if d.viewport_width > d.screen_width {
        violations.push(format!(
            "viewport width {} exceeds screen width {}",
            d.viewport_width, d.screen_width
        ));
    }
    if d.viewport_height > d.screen_height {
        violations.push(format!(
            "viewport height {} exceeds screen height {}",
            d.viewport_height, d.screen_height
        ));
    }
    if !(0.5..=4.0).contains(&d.device_pixel_ratio) {
        violations.push(format!(
            "device pixel ratio {} outside plausible range",
            d.device_pixel_ratio
        ));
    }
}

fn check_locale(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let locale = &profile.locale;

    match LOCALE_PAIRS
        .iter()
        .find(|pair| pair.timezone == locale.timezone)
    {
        Some(pair) => {
            if pair.utc_offset_minutes != locale.utc_offset_minutes {
                violations.push(format!(
                    "timezone '{}' carries offset {} but {} is expected",
                    locale.timezone, locale.utc_offset_minutes, pair.utc_offset_minutes
                ));
            }
        }
        None => violations.push(format!("unknown timezone '{}'", locale.timezone)),
    }
}

fn check_graphics(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let g = &profile.graphics;

    // The tuple must exist atomically in the table for the profile's
    // platform; a vendor from one entry with a renderer from another is
    // exactly the mismatch this catches.
    let table = Platform::from_label(&profile.browser.platform)
        .map(Platform::graphics)
        .unwrap_or_default();

    let known = table.iter().any(|t| {
        t.vendor == g.vendor
            && t.renderer == g.renderer
            && t.version == g.version
            && t.max_texture_size == g.max_texture_size
    });

    if !known {
        violations.push(format!(
            "graphics tuple ('{}', '{}') is not a known combination for platform '{}'",
            g.vendor, g.renderer, profile.browser.platform
        ));
    }
}

fn check_audio(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let a = &profile.audio;
    if !AUDIO_PAIRS.contains(&(a.sample_rate, a.max_channel_count)) {
        violations.push(format!(
            "audio pair ({} Hz, {} channels) is not a known combination",
            a.sample_rate, a.max_channel_count
        ));
    }
}

fn check_media_surfaces(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    if profile.fonts.available.is_empty() {
        violations.push("font list is empty".to_string());
    }

    // Fonts are the platform's stock set; a Segoe UI on MacIntel is as
    // loud a mismatch as a wrong renderer string.
    if let Some(platform) = Platform::from_label(&profile.browser.platform) {
        for font in &profile.fonts.available {
            if !platform.fonts().contains(&font.as_str()) {
                violations.push(format!(
                    "font '{font}' is not stock on platform '{}'",
                    profile.browser.platform
                ));
            }
        }
    }

    if profile.media_devices.is_empty() {
        violations.push("media device list is empty".to_string());
    }
    for device in &profile.media_devices {
        if !matches!(
            device.kind.as_str(),
            "audioinput" | "audiooutput" | "videoinput"
        ) {
            violations.push(format!("unknown media device kind '{}'", device.kind));
        }
    }
}

fn check_noise_and_battery(profile: &FingerprintProfile, violations: &mut Vec<String>) {
    let amplitude = profile.canvas.amplitude;
    if !(amplitude > 0.0 && amplitude <= 8.0) {
        violations.push(format!(
            "canvas noise amplitude {amplitude} outside (0, 8]"
        ));
    }

    let level = profile.battery.level;
    if !(0.0..=1.0).contains(&level) {
        violations.push(format!("battery level {level} outside 0..=1"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator;
    use veilprint_core::Identity;

    fn consistent_profile() -> FingerprintProfile {
        generator::generate(&Identity::new("validator-test").expect("valid identity"))
    }

    #[test]
    fn test_generated_profile_is_consistent() {
        let profile = consistent_profile();
        assert!(check(&profile).is_empty());
        assert!(validate(&profile).is_ok());
    }

    #[test]
    fn test_viewport_larger_than_screen_is_flagged() {
        let mut profile = consistent_profile();
        profile.display.viewport_width = profile.display.screen_width + 1;
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("viewport width")));
    }

    #[test]
    fn test_mismatched_user_agent_is_flagged() {
        let mut profile = consistent_profile();
        profile.browser.platform = "Win32".to_string();
        profile.browser.user_agent =
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                .to_string();
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("does not match platform")));
    }

    #[test]
    fn test_wrong_timezone_offset_is_flagged() {
        let mut profile = consistent_profile();
        profile.locale.timezone = "America/New_York".to_string();
        profile.locale.utc_offset_minutes = 540;
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("offset")));
    }

    #[test]
    fn test_frankenstein_graphics_tuple_is_flagged() {
        let mut profile = consistent_profile();
        profile.graphics.vendor = "Google Inc. (NVIDIA)".to_string();
        profile.graphics.renderer = "ANGLE (Apple, Apple M1, OpenGL 4.1)".to_string();
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("graphics tuple")));
    }

    #[test]
    fn test_unknown_audio_pair_is_flagged() {
        let mut profile = consistent_profile();
        profile.audio.sample_rate = 22050;
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("audio pair")));
    }

    #[test]
    fn test_languages_must_lead_with_primary() {
        let mut profile = consistent_profile();
        profile.browser.language = "fr-FR".to_string();
        profile.browser.languages = vec!["en-US".to_string(), "fr-FR".to_string()];
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("not first")));
    }

    #[test]
    fn test_foreign_font_is_flagged() {
        let mut profile = consistent_profile();
        profile.fonts.available.push("Wingdings 3000".to_string());
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("not stock")));
    }

    #[test]
    fn test_unknown_media_device_kind_is_flagged() {
        let mut profile = consistent_profile();
        profile.media_devices[0].kind = "smellinput".to_string();
        let violations = check(&profile);
        assert!(violations.iter().any(|v| v.contains("media device kind")));
    }

    #[test]
    fn test_validate_reports_all_violations() {
        let mut profile = consistent_profile();
        profile.display.viewport_height = profile.display.screen_height + 100;
        profile.battery.level = 1.7;
        match validate(&profile) {
            Err(FingerprintError::ValidationFailed { violations }) => {
                assert!(violations.len() >= 2, "{violations:?}");
            }
            other => panic!("expected ValidationFailed, got {other:?}"),
        }
    }
}
