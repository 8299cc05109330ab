use crate::config::{OPEN_TARGET_LABEL, PHRASES, TARGET_LABEL_PREFIX};
use crate::Target;
use std::f64::consts::PI;

/// Circumference of the progress ring for the given radius.
pub fn ring_circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// `stroke-dashoffset` that reveals `fraction` of the ring.
/// Out-of-range fractions are clamped to `[0.0, 1.0]`.
pub fn ring_dash_offset(fraction: f64, radius: f64) -> f64 {
    let circumference = ring_circumference(radius);
    circumference - fraction.clamp(0.0, 1.0) * circumference
}

/// Label under the count, e.g. "الهدف: 33".
pub fn target_label(target: Target) -> String {
    format!("{}: {}", TARGET_LABEL_PREFIX, target_button_label(target))
}

/// Text on a target preset button.
pub fn target_button_label(target: Target) -> String {
    match target {
        Target::Open => OPEN_TARGET_LABEL.to_string(),
        Target::Cycle(n) => n.to_string(),
    }
}

/// Whether the phrase is one the settings dialog offers.
pub fn is_known_phrase(phrase: &str) -> bool {
    PHRASES.contains(&phrase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RING_RADIUS;

    #[test]
    fn dash_offset_bounds() {
        let c = ring_circumference(RING_RADIUS);
        assert!((ring_dash_offset(0.0, RING_RADIUS) - c).abs() < 1e-9);
        assert!(ring_dash_offset(1.0, RING_RADIUS).abs() < 1e-9);
        assert!((ring_dash_offset(0.5, RING_RADIUS) - c / 2.0).abs() < 1e-9);
        assert_eq!(
            ring_dash_offset(1.5, RING_RADIUS),
            ring_dash_offset(1.0, RING_RADIUS)
        );
    }

    #[test]
    fn labels() {
        assert_eq!(target_label(Target::Open), "الهدف: مفتوح");
        assert_eq!(target_label(Target::default()), "الهدف: 33");
    }

    #[test]
    fn known_phrases() {
        assert!(is_known_phrase("سبحان الله"));
        assert!(!is_known_phrase("hello"));
    }
}
