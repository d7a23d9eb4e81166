//! Selection pools for fingerprint generation.
//!
//! Every value a generated profile carries comes out of one of these tables.
//! Correlated fields are stored as joint entries (screen plus pixel ratio,
//! timezone plus offset, the full WebGL tuple) so a draw can never produce a
//! combination that does not occur on real hardware.

use std::fmt;

/// Operating system family a profile is anchored on.
///
/// Drawn first; every platform-dependent pool is filtered by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Windows 10/11 on x64
    Windows,
    /// macOS on Intel or Apple Silicon (Chrome reports `MacIntel` for both)
    MacIntel,
    /// Desktop Linux on x64
    Linux,
}

impl Platform {
    /// The `navigator.platform` label Chrome reports for this family.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Windows => "Win32",
            Self::MacIntel => "MacIntel",
            Self::Linux => "Linux x86_64",
        }
    }

    /// Map a stored `navigator.platform` label back to the family.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Win32" => Some(Self::Windows),
            "MacIntel" => Some(Self::MacIntel),
            "Linux x86_64" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Build the Chrome user-agent string for this platform and major version.
    ///
    /// Chrome froze the OS token years ago (`Windows NT 10.0`, `10_15_7`),
    /// so only the major version varies.
    #[must_use]
    pub fn user_agent(self, major_version: u32) -> String {
        let os_token = match self {
            Self::Windows => "Windows NT 10.0; Win64; x64",
            Self::MacIntel => "Macintosh; Intel Mac OS X 10_15_7",
            Self::Linux => "X11; Linux x86_64",
        };
        format!(
            "Mozilla/5.0 ({os_token}) AppleWebKit/537.36 (KHTML, like Gecko) \
             Chrome/{major_version}.0.0.0 Safari/537.36"
        )
    }

    /// The OS token every user agent for this platform must contain.
    #[must_use]
    pub fn ua_token(self) -> &'static str {
        match self {
            Self::Windows => "Windows NT",
            Self::MacIntel => "Macintosh",
            Self::Linux => "X11; Linux",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Platform market-share weights.
pub const PLATFORM_WEIGHTS: &[(Platform, f64)] = &[
    (Platform::Windows, 68.0),
    (Platform::MacIntel, 22.0),
    (Platform::Linux, 10.0),
];

/// Chrome major versions currently seen in the wild, newest weighted highest.
pub const CHROME_VERSION_WEIGHTS: &[(u32, f64)] = &[
    (131, 40.0),
    (130, 30.0),
    (129, 18.0),
    (128, 12.0),
];

/// A screen mode: resolution plus the pixel ratio it ships with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenSpec {
    /// `screen.width` in CSS pixels
    pub width: u32,
    /// `screen.height` in CSS pixels
    pub height: u32,
    /// `window.devicePixelRatio` for this mode
    pub device_pixel_ratio: f64,
}

const fn screen(width: u32, height: u32, device_pixel_ratio: f64) -> ScreenSpec {
    ScreenSpec {
        width,
        height,
        device_pixel_ratio,
    }
}

/// Common Windows display modes.
pub const WINDOWS_SCREENS: &[(ScreenSpec, f64)] = &[
    (screen(1920, 1080, 1.0), 42.0),
    (screen(2560, 1440, 1.0), 18.0),
    (screen(1920, 1080, 1.25), 14.0),
    (screen(1366, 768, 1.0), 12.0),
    (screen(3840, 2160, 1.5), 8.0),
    (screen(1536, 864, 1.25), 6.0),
];

/// Common macOS display modes; Retina panels dominate.
pub const MAC_SCREENS: &[(ScreenSpec, f64)] = &[
    (screen(1440, 900, 2.0), 34.0),
    (screen(1512, 982, 2.0), 26.0),
    (screen(1728, 1117, 2.0), 16.0),
    (screen(2560, 1440, 2.0), 14.0),
    (screen(1680, 1050, 2.0), 10.0),
];

/// Common Linux desktop display modes.
pub const LINUX_SCREENS: &[(ScreenSpec, f64)] = &[
    (screen(1920, 1080, 1.0), 58.0),
    (screen(2560, 1440, 1.0), 22.0),
    (screen(1680, 1050, 1.0), 12.0),
    (screen(3840, 2160, 2.0), 8.0),
];

impl Platform {
    /// Weighted screen pool for this platform.
    #[must_use]
    pub fn screens(self) -> &'static [(ScreenSpec, f64)] {
        match self {
            Self::Windows => WINDOWS_SCREENS,
            Self::MacIntel => MAC_SCREENS,
            Self::Linux => LINUX_SCREENS,
        }
    }
}

/// A joint locale entry: language, language list, timezone and its offset.
///
/// Language and timezone are correlated in the real population, so they are
/// drawn together. Offsets are standard-time minutes east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalePair {
    /// Primary BCP 47 language tag
    pub language: &'static str,
    /// Full `navigator.languages` list
    pub languages: &'static [&'static str],
    /// IANA timezone name
    pub timezone: &'static str,
    /// Minutes east of UTC
    pub utc_offset_minutes: i32,
}

/// Joint language/timezone table.
pub const LOCALE_PAIRS: &[LocalePair] = &[
    LocalePair {
        language: "en-US",
        languages: &["en-US", "en"],
        timezone: "America/New_York",
        utc_offset_minutes: -300,
    },
    LocalePair {
        language: "en-US",
        languages: &["en-US", "en"],
        timezone: "America/Chicago",
        utc_offset_minutes: -360,
    },
    LocalePair {
        language: "en-US",
        languages: &["en-US", "en"],
        timezone: "America/Los_Angeles",
        utc_offset_minutes: -480,
    },
    LocalePair {
        language: "en-GB",
        languages: &["en-GB", "en"],
        timezone: "Europe/London",
        utc_offset_minutes: 0,
    },
    LocalePair {
        language: "de-DE",
        languages: &["de-DE", "de", "en"],
        timezone: "Europe/Berlin",
        utc_offset_minutes: 60,
    },
    LocalePair {
        language: "fr-FR",
        languages: &["fr-FR", "fr", "en"],
        timezone: "Europe/Paris",
        utc_offset_minutes: 60,
    },
    LocalePair {
        language: "es-ES",
        languages: &["es-ES", "es", "en"],
        timezone: "Europe/Madrid",
        utc_offset_minutes: 60,
    },
    LocalePair {
        language: "pt-BR",
        languages: &["pt-BR", "pt", "en"],
        timezone: "America/Sao_Paulo",
        utc_offset_minutes: -180,
    },
    LocalePair {
        language: "ja-JP",
        languages: &["ja-JP", "ja", "en"],
        timezone: "Asia/Tokyo",
        utc_offset_minutes: 540,
    },
    LocalePair {
        language: "en-AU",
        languages: &["en-AU", "en"],
        timezone: "Australia/Sydney",
        utc_offset_minutes: 600,
    },
];

/// One atomic WebGL identity tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphicsTuple {
    /// Unmasked vendor string
    pub vendor: &'static str,
    /// Unmasked renderer string
    pub renderer: &'static str,
    /// WebGL version string
    pub version: &'static str,
    /// `MAX_TEXTURE_SIZE` the hardware reports
    pub max_texture_size: u32,
}

const WEBGL1: &str = "WebGL 1.0 (OpenGL ES 2.0 Chromium)";

/// Windows GPUs surface through the ANGLE D3D11 backend.
pub const WINDOWS_GRAPHICS: &[GraphicsTuple] = &[
    GraphicsTuple {
        vendor: "Google Inc. (NVIDIA)",
        renderer: "ANGLE (NVIDIA, NVIDIA GeForce RTX 3060 Direct3D11 vs_5_0 ps_5_0, D3D11)",
        version: WEBGL1,
        max_texture_size: 32768,
    },
    GraphicsTuple {
        vendor: "Google Inc. (NVIDIA)",
        renderer: "ANGLE (NVIDIA, NVIDIA GeForce GTX 1660 Ti Direct3D11 vs_5_0 ps_5_0, D3D11)",
        version: WEBGL1,
        max_texture_size: 32768,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Intel)",
        renderer: "ANGLE (Intel, Intel(R) UHD Graphics 630 Direct3D11 vs_5_0 ps_5_0, D3D11)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Intel)",
        renderer: "ANGLE (Intel, Intel(R) Iris(R) Xe Graphics Direct3D11 vs_5_0 ps_5_0, D3D11)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (AMD)",
        renderer: "ANGLE (AMD, AMD Radeon RX 6700 XT Direct3D11 vs_5_0 ps_5_0, D3D11)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
];

/// macOS GPUs surface through ANGLE on Metal.
pub const MAC_GRAPHICS: &[GraphicsTuple] = &[
    GraphicsTuple {
        vendor: "Google Inc. (Apple)",
        renderer: "ANGLE (Apple, Apple M1, OpenGL 4.1)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Apple)",
        renderer: "ANGLE (Apple, Apple M2, OpenGL 4.1)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Apple)",
        renderer: "ANGLE (Apple, Apple M3 Pro, OpenGL 4.1)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Intel)",
        renderer: "ANGLE (Intel, Intel(R) Iris(TM) Plus Graphics 655, OpenGL 4.1)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
];

/// Linux GPUs surface through ANGLE on OpenGL.
pub const LINUX_GRAPHICS: &[GraphicsTuple] = &[
    GraphicsTuple {
        vendor: "Google Inc. (NVIDIA Corporation)",
        renderer: "ANGLE (NVIDIA Corporation, NVIDIA GeForce RTX 3060/PCIe/SSE2, OpenGL 4.5.0)",
        version: WEBGL1,
        max_texture_size: 32768,
    },
    GraphicsTuple {
        vendor: "Google Inc. (Intel)",
        renderer: "ANGLE (Intel, Mesa Intel(R) UHD Graphics 630 (CFL GT2), OpenGL 4.6)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
    GraphicsTuple {
        vendor: "Google Inc. (AMD)",
        renderer: "ANGLE (AMD, AMD Radeon RX 6600 (radeonsi, navi23, LLVM 15.0.7), OpenGL 4.6)",
        version: WEBGL1,
        max_texture_size: 16384,
    },
];

impl Platform {
    /// WebGL valid-pairs table for this platform.
    #[must_use]
    pub fn graphics(self) -> &'static [GraphicsTuple] {
        match self {
            Self::Windows => WINDOWS_GRAPHICS,
            Self::MacIntel => MAC_GRAPHICS,
            Self::Linux => LINUX_GRAPHICS,
        }
    }
}

/// Audio stack combinations seen on real hardware, as (sample rate, max
/// channel count) pairs.
pub const AUDIO_PAIRS: &[(u32, u32)] = &[(44100, 2), (48000, 2), (48000, 6), (48000, 8)];

/// Plausible `navigator.hardwareConcurrency` values.
pub const HARDWARE_CONCURRENCY_POOL: &[u32] = &[4, 6, 8, 10, 12, 16];

/// Stock Windows fonts.
pub const WINDOWS_FONTS: &[&str] = &[
    "Arial",
    "Arial Black",
    "Calibri",
    "Cambria",
    "Comic Sans MS",
    "Consolas",
    "Courier New",
    "Franklin Gothic Medium",
    "Georgia",
    "Impact",
    "Lucida Console",
    "Segoe UI",
    "Tahoma",
    "Times New Roman",
    "Trebuchet MS",
    "Verdana",
];

/// Stock macOS fonts.
pub const MAC_FONTS: &[&str] = &[
    "Arial",
    "Avenir",
    "Baskerville",
    "Futura",
    "Geneva",
    "Georgia",
    "Gill Sans",
    "Helvetica",
    "Helvetica Neue",
    "Menlo",
    "Monaco",
    "Palatino",
    "Times New Roman",
    "Verdana",
];

/// Fonts common across desktop Linux distributions.
pub const LINUX_FONTS: &[&str] = &[
    "Cantarell",
    "DejaVu Sans",
    "DejaVu Sans Mono",
    "DejaVu Serif",
    "FreeSans",
    "Liberation Mono",
    "Liberation Sans",
    "Liberation Serif",
    "Noto Sans",
    "Noto Serif",
    "Ubuntu",
];

/// Plugin names Chrome actually exposes; anything else is a tell.
pub const DEFAULT_PLUGINS: &[&str] = &["PDF Viewer", "Chrome PDF Viewer"];

/// Platform-consistent media device labels: (microphone, speakers, camera).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaDeviceLabels {
    /// `audioinput` label
    pub microphone: &'static str,
    /// `audiooutput` label
    pub speakers: &'static str,
    /// `videoinput` label, present on most but not all machines
    pub camera: &'static str,
}

impl Platform {
    /// Font pool for this platform.
    #[must_use]
    pub fn fonts(self) -> &'static [&'static str] {
        match self {
            Self::Windows => WINDOWS_FONTS,
            Self::MacIntel => MAC_FONTS,
            Self::Linux => LINUX_FONTS,
        }
    }

    /// Media device labels for this platform.
    #[must_use]
    pub fn media_device_labels(self) -> MediaDeviceLabels {
        match self {
            Self::Windows => MediaDeviceLabels {
                microphone: "Default - Microphone (Realtek(R) Audio)",
                speakers: "Default - Speakers (Realtek(R) Audio)",
                camera: "Integrated Camera",
            },
            Self::MacIntel => MediaDeviceLabels {
                microphone: "Default - MacBook Pro Microphone",
                speakers: "Default - MacBook Pro Speakers",
                camera: "FaceTime HD Camera",
            },
            Self::Linux => MediaDeviceLabels {
                microphone: "Default - Built-in Audio Analog Stereo",
                speakers: "Built-in Audio Analog Stereo",
                camera: "Integrated Camera",
            },
        }
    }
}

/// Display-only network fingerprint triples: (JA3, JA4, Akamai HTTP/2).
///
/// Chrome's TLS stack produces a small set of distinct client hellos; these
/// strings are carried for inspection only and never influence the wire.
pub const NETWORK_STUBS: &[(&str, &str, &str)] = &[
    (
        "771,4865-4866-4867-49195-49199,0-23-65281-10-11-35-16-5-13-18-51-45-43-27-17513,29-23-24,0",
        "t13d1516h2_8daaf6152771_b0da82dd1658",
        "1:65536;2:0;4:6291456;6:262144|15663105|0|m,a,s,p",
    ),
    (
        "771,4865-4866-4867-49195-49199,0-23-65281-10-11-35-16-5-13-18-51-45-43-27,29-23-24,0",
        "t13d1516h2_8daaf6152771_e5627efa2ab1",
        "1:65536;2:0;4:6291456;6:262144|15663105|0|m,a,s,p",
    ),
    (
        "771,4865-4866-4867-49195-49199-49196,0-23-65281-10-11-35-16-5-13,29-23-24,0",
        "t13d1517h2_8daaf6152771_b1ff8ab2d16f",
        "1:65536;2:0;4:6291456;6:262144|15663105|0|m,a,s,p",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_label_roundtrip() {
        for &(platform, _) in PLATFORM_WEIGHTS {
            assert_eq!(Platform::from_label(platform.label()), Some(platform));
        }
        assert_eq!(Platform::from_label("Nintendo"), None);
    }

    #[test]
    fn test_user_agent_carries_platform_token() {
        for &(platform, _) in PLATFORM_WEIGHTS {
            let ua = platform.user_agent(131);
            assert!(ua.contains(platform.ua_token()), "{ua}");
            assert!(ua.contains("Chrome/131.0.0.0"), "{ua}");
        }
    }

    #[test]
    fn test_screen_pools_nonempty_with_positive_weights() {
        for &(platform, _) in PLATFORM_WEIGHTS {
            let pool = platform.screens();
            assert!(!pool.is_empty());
            for &(spec, weight) in pool {
                assert!(weight > 0.0);
                assert!(spec.width > 0 && spec.height > 0);
                assert!(spec.device_pixel_ratio >= 1.0);
            }
        }
    }

    #[test]
    fn test_locale_pairs_languages_start_with_language() {
        for pair in LOCALE_PAIRS {
            assert_eq!(pair.languages.first(), Some(&pair.language));
            assert!(pair.utc_offset_minutes.abs() <= 14 * 60);
        }
    }

    #[test]
    fn test_graphics_pools_nonempty() {
        for &(platform, _) in PLATFORM_WEIGHTS {
            assert!(!platform.graphics().is_empty());
        }
    }

    #[test]
    fn test_font_pools_large_enough_to_subset() {
        // The generator draws 8..=12 fonts per profile.
        for &(platform, _) in PLATFORM_WEIGHTS {
            assert!(platform.fonts().len() >= 11, "{platform}");
        }
    }
}
