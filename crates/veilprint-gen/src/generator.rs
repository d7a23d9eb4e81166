//! Deterministic profile generation.
//!
//! The same identity always yields the same profile: the identity string is
//! hashed to a seed, the seed drives a single `StdRng`, and every field is
//! drawn from that one stream in a fixed order. The stream is never reseeded
//! or forked per field, so reordering or adding a draw is a breaking change
//! and requires bumping [`GENERATOR_VERSION`].

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use veilprint_core::{
    AudioProfile, BatteryProfile, BrowserIdentity, CanvasNoiseProfile, Display,
    FingerprintProfile, FontProfile, GraphicsProfile, Identity, LocaleProfile, MediaDevice,
    NetworkProfileStub, Timestamp, GENERATOR_VERSION,
};

use crate::pools::{
    self, Platform, AUDIO_PAIRS, CHROME_VERSION_WEIGHTS, HARDWARE_CONCURRENCY_POOL, LOCALE_PAIRS,
    PLATFORM_WEIGHTS,
};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// FNV-1a hash of the identity string, used as the generation seed.
#[must_use]
pub fn identity_seed(identity: &Identity) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in identity.as_str().bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Draw one entry from a weighted pool.
///
/// Pool tables are compile-time constants with strictly positive weights, so
/// `WeightedIndex` construction cannot fail.
fn weighted<T: Copy>(rng: &mut StdRng, pool: &[(T, f64)]) -> T {
    let dist = WeightedIndex::new(pool.iter().map(|(_, w)| *w)).expect("valid pool weights");
    pool[dist.sample(rng)].0
}

fn uniform<T: Copy>(rng: &mut StdRng, pool: &[T]) -> T {
    pool[rng.gen_range(0..pool.len())]
}

fn media_device(kind: &str, label: &str, rng: &mut StdRng) -> MediaDevice {
    MediaDevice {
        kind: kind.to_string(),
        label: label.to_string(),
        device_id: format!("{:016x}{:016x}", rng.gen::<u64>(), rng.gen::<u64>()),
    }
}

/// Generate the complete fingerprint profile for an identity.
///
/// Deterministic: repeated calls with the same identity return identical
/// profiles except for `created_at`, which records the moment of this call.
#[must_use]
pub fn generate(identity: &Identity) -> FingerprintProfile {
    let seed = identity_seed(identity);
    let mut rng = StdRng::seed_from_u64(seed);

    // Fixed draw order; new fields only ever append to the end of the
    // stream. Do not reorder, remove or insert draws without bumping
    // GENERATOR_VERSION.
    let platform = weighted(&mut rng, PLATFORM_WEIGHTS);
    let chrome_major = weighted(&mut rng, CHROME_VERSION_WEIGHTS);
    let screen = weighted(&mut rng, platform.screens());
    let width_shrink = rng.gen_range(0..=40);
    let height_shrink = rng.gen_range(60..=140);
    let locale = uniform(&mut rng, LOCALE_PAIRS);
    let hardware_concurrency = uniform(&mut rng, HARDWARE_CONCURRENCY_POOL);
    let graphics = uniform(&mut rng, platform.graphics());
    let (sample_rate, max_channel_count) = uniform(&mut rng, AUDIO_PAIRS);
    let canvas_seed = rng.gen::<u64>();
    let amplitude = rng.gen_range(0.5..=3.0);
    let battery_level = rng.gen_range(0.25..=0.95);
    let charging = rng.gen_bool(0.6);
    let (ja3, ja4, http2_akamai) = uniform(&mut rng, pools::NETWORK_STUBS);
    let font_count = rng.gen_range(8..=12);
    let mut fonts: Vec<String> = platform
        .fonts()
        .choose_multiple(&mut rng, font_count)
        .map(ToString::to_string)
        .collect();
    fonts.sort_unstable();
    let labels = platform.media_device_labels();
    let mut media_devices = vec![
        media_device("audioinput", labels.microphone, &mut rng),
        media_device("audiooutput", labels.speakers, &mut rng),
    ];
    if rng.gen_bool(0.7) {
        media_devices.push(media_device("videoinput", labels.camera, &mut rng));
    }

    let profile = FingerprintProfile {
        identity: identity.clone(),
        browser: BrowserIdentity {
            user_agent: platform.user_agent(chrome_major),
            platform: platform.label().to_string(),
            language: locale.language.to_string(),
            languages: locale.languages.iter().map(ToString::to_string).collect(),
            hardware_concurrency,
            suppress_webdriver: true,
        },
        display: Display {
            screen_width: screen.width,
            screen_height: screen.height,
            viewport_width: screen.width - width_shrink,
            viewport_height: screen.height - height_shrink,
            device_pixel_ratio: screen.device_pixel_ratio,
        },
        locale: LocaleProfile {
            timezone: locale.timezone.to_string(),
            utc_offset_minutes: locale.utc_offset_minutes,
        },
        graphics: GraphicsProfile {
            vendor: graphics.vendor.to_string(),
            renderer: graphics.renderer.to_string(),
            version: graphics.version.to_string(),
            max_texture_size: graphics.max_texture_size,
        },
        audio: AudioProfile {
            sample_rate,
            max_channel_count,
        },
        canvas: CanvasNoiseProfile {
            seed: canvas_seed,
            amplitude,
        },
        fonts: FontProfile { available: fonts },
        plugins: pools::DEFAULT_PLUGINS
            .iter()
            .map(ToString::to_string)
            .collect(),
        media_devices,
        battery: BatteryProfile {
            level: battery_level,
            charging,
        },
        network: NetworkProfileStub {
            ja3: ja3.to_string(),
            ja4: ja4.to_string(),
            http2_akamai: http2_akamai.to_string(),
        },
        created_at: Timestamp::now(),
    };

    tracing::debug!(
        identity = %identity,
        seed,
        generator_version = GENERATOR_VERSION,
        platform = %platform,
        "Generated fingerprint profile"
    );

    profile
}
