//! The fingerprint profile data model.
//!
//! A [`FingerprintProfile`] is the unit of identity: the full bundle of
//! browser-observable values assigned to one caller-supplied key. Profiles
//! are plain serde-serializable data; generation, validation, persistence and
//! compilation live in the sibling crates.

use crate::types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Version tag of the generation algorithm, persisted with every record.
///
/// Bumped whenever the field draw order or a selection pool changes in a way
/// that alters the values an existing identity would receive. Stored records
/// with an older tag are returned unchanged; the tag exists for audit and
/// offline migration, never automatic regeneration.
pub const GENERATOR_VERSION: u32 = 1;

/// The complete browser fingerprint assigned to one identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintProfile {
    /// Caller-supplied persistence key; never generated internally
    pub identity: Identity,
    /// Navigator-level identity (user agent, platform, languages, hardware)
    pub browser: BrowserIdentity,
    /// Screen and viewport geometry
    pub display: Display,
    /// Timezone and UTC offset, always drawn as a joint pair
    pub locale: LocaleProfile,
    /// WebGL vendor/renderer tuple from the valid-pairs table
    pub graphics: GraphicsProfile,
    /// Audio stack parameters
    pub audio: AudioProfile,
    /// Seed and amplitude for deterministic canvas/audio perturbation
    pub canvas: CanvasNoiseProfile,
    /// Fonts the profile reports as installed, platform-consistent
    pub fonts: FontProfile,
    /// `navigator.plugins` entries by display name
    pub plugins: Vec<String>,
    /// Devices reported by `mediaDevices.enumerateDevices`
    pub media_devices: Vec<MediaDevice>,
    /// Cosmetic battery state
    pub battery: BatteryProfile,
    /// Advisory-only network fingerprint display strings (see module docs)
    pub network: NetworkProfileStub,
    /// Timestamp of first generation; immutable once set
    pub created_at: Timestamp,
}

/// Navigator-level browser identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserIdentity {
    /// Full user-agent string
    pub user_agent: String,
    /// `navigator.platform` label (e.g. `Win32`, `MacIntel`)
    pub platform: String,
    /// Primary BCP 47 language tag
    pub language: String,
    /// Ordered `navigator.languages` list; first entry equals `language`
    pub languages: Vec<String>,
    /// `navigator.hardwareConcurrency` hint
    pub hardware_concurrency: u32,
    /// When true, `navigator.webdriver` reads as `undefined`
    pub suppress_webdriver: bool,
}

/// Screen and viewport geometry.
///
/// The viewport is what page content can measure; it never exceeds the
/// screen on either axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Display {
    /// `screen.width` in CSS pixels
    pub screen_width: u32,
    /// `screen.height` in CSS pixels
    pub screen_height: u32,
    /// Inner window width, <= `screen_width`
    pub viewport_width: u32,
    /// Inner window height, <= `screen_height`
    pub viewport_height: u32,
    /// `window.devicePixelRatio`
    pub device_pixel_ratio: f64,
}

/// Timezone identity: IANA zone name plus its UTC offset.
///
/// The two fields are never set independently; they come from a fixed table
/// of joint pairs so the offset always matches the zone name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleProfile {
    /// IANA timezone name (e.g. `America/New_York`)
    pub timezone: String,
    /// Minutes east of UTC for the zone's standard time
    pub utc_offset_minutes: i32,
}

impl LocaleProfile {
    /// Offset in the `Date.prototype.getTimezoneOffset` convention
    /// (minutes *behind* UTC; New York standard time is `300`).
    #[must_use]
    pub fn js_timezone_offset(&self) -> i32 {
        -self.utc_offset_minutes
    }
}

/// WebGL identity, always one atomic tuple from the valid-pairs table.
///
/// Vendor, renderer and version are never substituted independently; a
/// mismatched combination is exactly what a detector looks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsProfile {
    /// Unmasked WebGL vendor string
    pub vendor: String,
    /// Unmasked WebGL renderer string
    pub renderer: String,
    /// WebGL version string
    pub version: String,
    /// `MAX_TEXTURE_SIZE` reported by the context
    pub max_texture_size: u32,
}

/// Audio stack parameters, drawn as a pair from real-world combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// `AudioContext.sampleRate` in Hz
    pub sample_rate: u32,
    /// `destination.maxChannelCount`
    pub max_channel_count: u32,
}

/// Seed and amplitude for deterministic canvas/audio noise.
///
/// The compiled injection script keys its per-pixel and per-bin perturbation
/// on `(seed, position)`, so repeated reads within one session are identical
/// while still differing from an unmodified engine's raw output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasNoiseProfile {
    /// Per-identity noise seed
    pub seed: u64,
    /// Perturbation amplitude in pixel-value units, small and positive
    pub amplitude: f64,
}

/// The set of fonts the profile admits to having installed.
///
/// A subset of the platform's stock fonts; font probing via text
/// measurement is the classic enumeration channel, so the compiled script
/// degrades measurements for anything outside this list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontProfile {
    /// Font family names reported as available
    pub available: Vec<String>,
}

/// One entry reported by `navigator.mediaDevices.enumerateDevices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDevice {
    /// Device kind: `audioinput`, `audiooutput` or `videoinput`
    pub kind: String,
    /// Human-readable device label, platform-consistent
    pub label: String,
    /// Opaque per-identity device id
    pub device_id: String,
}

/// Cosmetic battery state exposed through `navigator.getBattery`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryProfile {
    /// Charge level in `0.0..=1.0`
    pub level: f64,
    /// Whether the battery reports as charging
    pub charging: bool,
}

/// Display-only strings resembling TLS/HTTP2 client fingerprints.
///
/// These are **advisory only**: nothing running inside a browser page can
/// alter wire-level TLS or HTTP/2 behavior, so these strings are carried for
/// inspection and display but are never consulted by the script or flag
/// compilers. Real network-fingerprint control requires an external proxy
/// layer outside this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfileStub {
    /// JA3-style display string
    pub ja3: String,
    /// JA4-style display string
    pub ja4: String,
    /// Akamai-style HTTP/2 settings display string
    pub http2_akamai: String,
}

/// On-disk envelope: the profile plus the generator version that produced it.
///
/// One pretty-printed JSON record per identity, human-inspectable for audit
/// and the export/import operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// `GENERATOR_VERSION` at the time the profile was generated or imported
    pub generator_version: u32,
    /// The stored profile
    pub profile: FingerprintProfile,
}

impl ProfileRecord {
    /// Wrap a profile in a record tagged with the current generator version.
    #[must_use]
    pub fn new(profile: FingerprintProfile) -> Self {
        Self {
            generator_version: GENERATOR_VERSION,
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> FingerprintProfile {
        FingerprintProfile {
            identity: Identity::new("user001").expect("valid identity"),
            browser: BrowserIdentity {
                user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                             (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36"
                    .to_string(),
                platform: "Win32".to_string(),
                language: "en-US".to_string(),
                languages: vec!["en-US".to_string(), "en".to_string()],
                hardware_concurrency: 8,
                suppress_webdriver: true,
            },
            display: Display {
                screen_width: 1920,
                screen_height: 1080,
                viewport_width: 1890,
                viewport_height: 1000,
                device_pixel_ratio: 1.0,
            },
            locale: LocaleProfile {
                timezone: "America/New_York".to_string(),
                utc_offset_minutes: -300,
            },
            graphics: GraphicsProfile {
                vendor: "Google Inc. (NVIDIA)".to_string(),
                renderer: "ANGLE (NVIDIA, NVIDIA GeForce GTX 1660 Ti Direct3D11 vs_5_0 ps_5_0, \
                           D3D11)"
                    .to_string(),
                version: "WebGL 1.0 (OpenGL ES 2.0 Chromium)".to_string(),
                max_texture_size: 16384,
            },
            audio: AudioProfile {
                sample_rate: 48000,
                max_channel_count: 2,
            },
            canvas: CanvasNoiseProfile {
                seed: 0x1234_5678_9abc_def0,
                amplitude: 2.0,
            },
            fonts: FontProfile {
                available: vec![
                    "Arial".to_string(),
                    "Segoe UI".to_string(),
                    "Tahoma".to_string(),
                ],
            },
            plugins: vec!["PDF Viewer".to_string(), "Chrome PDF Viewer".to_string()],
            media_devices: vec![MediaDevice {
                kind: "audioinput".to_string(),
                label: "Default - Microphone (Realtek(R) Audio)".to_string(),
                device_id: "f3a9c2d4e5b6a7c8d9e0f1a2b3c4d5e6".to_string(),
            }],
            battery: BatteryProfile {
                level: 0.83,
                charging: true,
            },
            network: NetworkProfileStub {
                ja3: "771,4865-4866,0-23-65281,29-23-24,0".to_string(),
                ja4: "t13d1516h2_8daaf6152771_b0da82dd1658".to_string(),
                http2_akamai: "1:65536;3:1000;4:6291456|15663105|0|m,a,s,p".to_string(),
            },
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn test_profile_json_roundtrip() {
        let profile = sample_profile();
        let json = serde_json::to_string_pretty(&profile).expect("serialize profile");
        let back: FingerprintProfile = serde_json::from_str(&json).expect("deserialize profile");
        assert_eq!(profile, back);
    }

    #[test]
    fn test_record_carries_current_version() {
        let record = ProfileRecord::new(sample_profile());
        assert_eq!(record.generator_version, GENERATOR_VERSION);
    }

    #[test]
    fn test_js_timezone_offset_convention() {
        let locale = LocaleProfile {
            timezone: "America/New_York".to_string(),
            utc_offset_minutes: -300,
        };
        // JS reports minutes behind UTC, so New York is +300.
        assert_eq!(locale.js_timezone_offset(), 300);

        let tokyo = LocaleProfile {
            timezone: "Asia/Tokyo".to_string(),
            utc_offset_minutes: 540,
        };
        assert_eq!(tokyo.js_timezone_offset(), -540);
    }
}
