//! Injection script compilation.
//!
//! Turns a validated profile into a self-contained JavaScript IIFE meant to
//! run before any page script (`Page.addScriptToEvaluateOnNewDocument` or
//! equivalent). The script carries no external references, checks that every
//! API it patches exists before touching it, and is idempotent: a sentinel
//! property makes a second evaluation in the same context a no-op.

use tracing::debug;
use veilprint_core::{FingerprintProfile, Result};
use veilprint_gen::validate;

/// A compiled, ready-to-inject script.
///
/// Opaque on purpose; the only useful operation is handing the source to a
/// browser. Construction goes through [`compile`], which refuses profiles
/// that fail consistency validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionScript(String);

impl InjectionScript {
    /// The JavaScript source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length of the source in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the source is empty. Compiled scripts never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for InjectionScript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Escape a string for inclusion in a single-quoted JS literal.
fn js_str(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("'{escaped}'")
}

/// Compile the profile into an injection script.
///
/// Fails with `ValidationFailed` if the profile is internally inconsistent;
/// injecting a mismatched fingerprint is worse than injecting none.
pub fn compile(profile: &FingerprintProfile) -> Result<InjectionScript> {
    validate(profile)?;

    let mut script = String::with_capacity(8 * 1024);
    script.push_str(
        "(function() {\n\
         'use strict';\n\
         if (window.__vp_applied) { return; }\n\
         try {\n\
         Object.defineProperty(window, '__vp_applied', {\n\
         value: true, enumerable: false, configurable: false, writable: false\n\
         });\n\
         } catch (e) { return; }\n\
         const defineGetter = function(obj, prop, value) {\n\
         try {\n\
         Object.defineProperty(obj, prop, { get: function() { return value; }, configurable: true });\n\
         } catch (e) {}\n\
         };\n",
    );

    script.push_str(&navigator_section(profile));
    script.push_str(&screen_section(profile));
    script.push_str(&timezone_section(profile));
    script.push_str(&webgl_section(profile));
    script.push_str(&noise_helpers(profile));
    script.push_str(&canvas_section());
    script.push_str(&audio_section(profile));
    script.push_str(&fonts_section(profile));
    script.push_str(&plugins_section(profile));
    script.push_str(&media_devices_section(profile));
    script.push_str(&battery_section(profile));

    script.push_str("})();\n");

    debug!(
        identity = %profile.identity,
        bytes = script.len(),
        "Compiled injection script"
    );

    Ok(InjectionScript(script))
}

fn navigator_section(profile: &FingerprintProfile) -> String {
    let browser = &profile.browser;
    let languages = browser
        .languages
        .iter()
        .map(|l| js_str(l))
        .collect::<Vec<_>>()
        .join(", ");

    let mut section = format!(
        "defineGetter(navigator, 'userAgent', {ua});\n\
         defineGetter(navigator, 'platform', {platform});\n\
         defineGetter(navigator, 'language', {language});\n\
         defineGetter(navigator, 'languages', Object.freeze([{languages}]));\n\
         defineGetter(navigator, 'hardwareConcurrency', {cores});\n\
         defineGetter(navigator, 'vendor', 'Google Inc.');\n\
         defineGetter(navigator, 'maxTouchPoints', 0);\n",
        ua = js_str(&browser.user_agent),
        platform = js_str(&browser.platform),
        language = js_str(&browser.language),
        cores = browser.hardware_concurrency,
    );

    if browser.suppress_webdriver {
        section.push_str("defineGetter(navigator, 'webdriver', undefined);\n");
    }

    section
}

fn screen_section(profile: &FingerprintProfile) -> String {
    let d = &profile.display;
    format!(
        "defineGetter(screen, 'width', {sw});\n\
         defineGetter(screen, 'height', {sh});\n\
         defineGetter(screen, 'availWidth', {sw});\n\
         defineGetter(screen, 'availHeight', {avail_h});\n\
         defineGetter(screen, 'colorDepth', 24);\n\
         defineGetter(screen, 'pixelDepth', 24);\n\
         defineGetter(window, 'devicePixelRatio', {dpr});\n",
        sw = d.screen_width,
        sh = d.screen_height,
        avail_h = d.screen_height.saturating_sub(40),
        dpr = d.device_pixel_ratio,
    )
}

fn timezone_section(profile: &FingerprintProfile) -> String {
    format!(
        "Date.prototype.getTimezoneOffset = function() {{ return {offset}; }};\n\
         if (window.Intl && Intl.DateTimeFormat) {{\n\
         const origResolved = Intl.DateTimeFormat.prototype.resolvedOptions;\n\
         Intl.DateTimeFormat.prototype.resolvedOptions = function() {{\n\
         const options = origResolved.apply(this, arguments);\n\
         options.timeZone = {tz};\n\
         return options;\n\
         }};\n\
         }}\n",
        offset = profile.locale.js_timezone_offset(),
        tz = js_str(&profile.locale.timezone),
    )
}

fn webgl_section(profile: &FingerprintProfile) -> String {
    let g = &profile.graphics;
    // 37445/37446 are UNMASKED_VENDOR_WEBGL/UNMASKED_RENDERER_WEBGL from the
    // WEBGL_debug_renderer_info extension; 7938 is VERSION, 3379 is
    // MAX_TEXTURE_SIZE.
    format!(
        "const patchGetParameter = function(proto) {{\n\
         if (!proto || !proto.getParameter) {{ return; }}\n\
         const origGetParameter = proto.getParameter;\n\
         proto.getParameter = function(parameter) {{\n\
         if (parameter === 37445) {{ return {vendor}; }}\n\
         if (parameter === 37446) {{ return {renderer}; }}\n\
         if (parameter === 7938) {{ return {version}; }}\n\
         if (parameter === 3379) {{ return {max_texture}; }}\n\
         return origGetParameter.apply(this, arguments);\n\
         }};\n\
         }};\n\
         if (window.WebGLRenderingContext) {{ patchGetParameter(WebGLRenderingContext.prototype); }}\n\
         if (window.WebGL2RenderingContext) {{ patchGetParameter(WebGL2RenderingContext.prototype); }}\n",
        vendor = js_str(&g.vendor),
        renderer = js_str(&g.renderer),
        version = js_str(&g.version),
        max_texture = g.max_texture_size,
    )
}

/// Position-keyed noise shared by the canvas and audio patches.
///
/// The perturbation for a given position is a pure function of (seed,
/// position), so repeated reads of unchanged data within a session are
/// byte-identical while the values still differ per identity.
fn noise_helpers(profile: &FingerprintProfile) -> String {
    let seed_lo = (profile.canvas.seed & 0xffff_ffff) as u32;
    let seed_hi = (profile.canvas.seed >> 32) as u32;
    format!(
        "const vpMix = function(i) {{\n\
         let h = (i ^ {seed_lo}) >>> 0;\n\
         h = Math.imul(h ^ (h >>> 16), 2246822507) >>> 0;\n\
         h = Math.imul(h ^ {seed_hi} ^ (h >>> 13), 3266489909) >>> 0;\n\
         return (h ^ (h >>> 16)) >>> 0;\n\
         }};\n\
         const vpNoise = function(i) {{\n\
         return (((vpMix(i) & 0xff) / 255) - 0.5) * 2 * {amplitude};\n\
         }};\n",
        amplitude = profile.canvas.amplitude,
    )
}

fn canvas_section() -> String {
    // toDataURL routes through a scratch canvas so the source canvas is
    // never mutated; otherwise repeated exports would accumulate noise.
    "if (window.CanvasRenderingContext2D) {\n\
     const origGetImageData = CanvasRenderingContext2D.prototype.getImageData;\n\
     CanvasRenderingContext2D.prototype.getImageData = function() {\n\
     const imageData = origGetImageData.apply(this, arguments);\n\
     const data = imageData.data;\n\
     for (let i = 0; i < data.length; i += 4) {\n\
     data[i] = Math.max(0, Math.min(255, data[i] + Math.round(vpNoise(i))));\n\
     data[i + 1] = Math.max(0, Math.min(255, data[i + 1] + Math.round(vpNoise(i + 1))));\n\
     data[i + 2] = Math.max(0, Math.min(255, data[i + 2] + Math.round(vpNoise(i + 2))));\n\
     }\n\
     return imageData;\n\
     };\n\
     const origToDataURL = HTMLCanvasElement.prototype.toDataURL;\n\
     HTMLCanvasElement.prototype.toDataURL = function() {\n\
     try {\n\
     if (this.width > 0 && this.height > 0) {\n\
     const ctx = this.getContext('2d');\n\
     if (ctx) {\n\
     const copy = document.createElement('canvas');\n\
     copy.width = this.width;\n\
     copy.height = this.height;\n\
     const copyCtx = copy.getContext('2d');\n\
     copyCtx.putImageData(ctx.getImageData(0, 0, this.width, this.height), 0, 0);\n\
     return origToDataURL.apply(copy, arguments);\n\
     }\n\
     }\n\
     } catch (e) {}\n\
     return origToDataURL.apply(this, arguments);\n\
     };\n\
     }\n"
        .to_string()
}

fn audio_section(profile: &FingerprintProfile) -> String {
    let a = &profile.audio;
    format!(
        "if (window.BaseAudioContext) {{\n\
         defineGetter(BaseAudioContext.prototype, 'sampleRate', {rate});\n\
         }}\n\
         if (window.AudioDestinationNode) {{\n\
         defineGetter(AudioDestinationNode.prototype, 'maxChannelCount', {channels});\n\
         }}\n\
         if (window.AnalyserNode) {{\n\
         const origGetFloatFrequencyData = AnalyserNode.prototype.getFloatFrequencyData;\n\
         AnalyserNode.prototype.getFloatFrequencyData = function(array) {{\n\
         origGetFloatFrequencyData.apply(this, arguments);\n\
         for (let i = 0; i < array.length; i++) {{\n\
         array[i] = array[i] + vpNoise(i) * 0.01;\n\
         }}\n\
         }};\n\
         }}\n",
        rate = a.sample_rate,
        channels = a.max_channel_count,
    )
}

/// Degrades text measurements for fonts outside the profile's list, which
/// is what font-enumeration probes key on.
fn fonts_section(profile: &FingerprintProfile) -> String {
    let fonts = profile
        .fonts
        .available
        .iter()
        .map(|f| js_str(f))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "if (window.CanvasRenderingContext2D) {{\n\
         const vpFonts = [{fonts}];\n\
         const origMeasureText = CanvasRenderingContext2D.prototype.measureText;\n\
         CanvasRenderingContext2D.prototype.measureText = function(text) {{\n\
         const result = origMeasureText.apply(this, arguments);\n\
         const family = this.font.split(' ').pop().replace(/['\"]/g, '');\n\
         if (vpFonts.includes(family)) {{ return result; }}\n\
         return {{\n\
         width: result.width * 0.95,\n\
         actualBoundingBoxLeft: result.actualBoundingBoxLeft,\n\
         actualBoundingBoxRight: result.actualBoundingBoxRight,\n\
         fontBoundingBoxAscent: result.fontBoundingBoxAscent,\n\
         fontBoundingBoxDescent: result.fontBoundingBoxDescent,\n\
         actualBoundingBoxAscent: result.actualBoundingBoxAscent,\n\
         actualBoundingBoxDescent: result.actualBoundingBoxDescent\n\
         }};\n\
         }};\n\
         }}\n"
    )
}

fn plugins_section(profile: &FingerprintProfile) -> String {
    let entries = profile
        .plugins
        .iter()
        .map(|name| {
            format!(
                "{{\n\
                 name: {name},\n\
                 filename: 'internal-pdf-viewer',\n\
                 description: 'Portable Document Format',\n\
                 length: 2,\n\
                 0: {{ type: 'application/pdf', suffixes: 'pdf', description: 'Portable Document Format' }},\n\
                 1: {{ type: 'text/pdf', suffixes: 'pdf', description: 'Portable Document Format' }}\n\
                 }}",
                name = js_str(name),
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("defineGetter(navigator, 'plugins', [{entries}]);\n")
}

fn media_devices_section(profile: &FingerprintProfile) -> String {
    let devices = profile
        .media_devices
        .iter()
        .map(|d| {
            format!(
                "{{ kind: {kind}, label: {label}, deviceId: {id}, groupId: '' }}",
                kind = js_str(&d.kind),
                label = js_str(&d.label),
                id = js_str(&d.device_id),
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "if (navigator.mediaDevices && navigator.mediaDevices.enumerateDevices) {{\n\
         navigator.mediaDevices.enumerateDevices = function() {{\n\
         return Promise.resolve([{devices}]);\n\
         }};\n\
         }}\n"
    )
}

fn battery_section(profile: &FingerprintProfile) -> String {
    let b = &profile.battery;
    format!(
        "if (navigator.getBattery) {{\n\
         navigator.getBattery = function() {{\n\
         return Promise.resolve({{\n\
         level: {level},\n\
         charging: {charging},\n\
         chargingTime: {charging_time},\n\
         dischargingTime: Infinity,\n\
         addEventListener: function() {{}},\n\
         removeEventListener: function() {{}},\n\
         dispatchEvent: function() {{ return false; }}\n\
         }});\n\
         }};\n\
         }}\n",
        level = b.level,
        charging = b.charging,
        charging_time = if b.charging { "0" } else { "Infinity" },
    )
}
