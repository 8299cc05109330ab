//! Vibration through `navigator.vibrate`.
//! Browsers without the API (notably iOS Safari) are skipped silently.

use js_sys::{Array, Reflect};
use log::debug;
use misbaha::HapticPattern;
use wasm_bindgen::JsValue;
use web_sys::Navigator;

fn supports_vibration(navigator: &Navigator) -> bool {
    Reflect::has(navigator, &JsValue::from_str("vibrate")).unwrap_or(false)
}

/// Play one pattern. A later call replaces any vibration still running.
pub fn play(pattern: HapticPattern) {
    let navigator = gloo_utils::window().navigator();
    if !supports_vibration(&navigator) {
        debug!("navigator.vibrate unavailable, skipping {:?}", pattern);
        return;
    }

    let accepted = match pattern.durations() {
        [single] => navigator.vibrate_with_duration(*single),
        durations => {
            let sequence: Array = durations.iter().map(|&ms| JsValue::from(ms)).collect();
            navigator.vibrate_with_pattern(&sequence)
        }
    };
    if !accepted {
        debug!("Browser rejected vibration {:?}", pattern);
    }
}

pub fn play_all(patterns: &[HapticPattern]) {
    for &pattern in patterns {
        play(pattern);
    }
}
