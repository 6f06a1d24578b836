//! Zoom bounds and the label declutter rule.

/// Smallest view scale.
pub const MIN_SCALE: f64 = 0.1;
/// Largest view scale.
pub const MAX_SCALE: f64 = 10.0;
/// Scale factor of one wheel notch.
pub const ZOOM_STEP: f64 = 1.1;
/// Labels are drawn only while the view scale is below this.
pub const LABEL_SCALE_THRESHOLD: f64 = 2.5;

/// Whether node labels are drawn at view scale `k`.
///
/// Depends on the scale alone, never on how many nodes are on screen.
pub fn labels_visible(k: f64) -> bool {
	k < LABEL_SCALE_THRESHOLD
}

/// Scale after one wheel event; scrolling down zooms out.
pub fn zoomed(k: f64, delta_y: f64) -> f64 {
	let factor = if delta_y > 0.0 { 1.0 / ZOOM_STEP } else { ZOOM_STEP };
	(k * factor).clamp(MIN_SCALE, MAX_SCALE)
}

#[cfg(test)]
mod tests {
	use test_case::test_case;

	use super::*;

	#[test_case(0.1, true)]
	#[test_case(1.0, true)]
	#[test_case(2.49, true)]
	#[test_case(2.5, false)]
	#[test_case(10.0, false)]
	fn label_visibility_depends_only_on_scale(k: f64, visible: bool) {
		assert_eq!(labels_visible(k), visible);
	}

	#[test]
	fn zoom_is_clamped() {
		assert_eq!(zoomed(MAX_SCALE, -1.0), MAX_SCALE);
		assert_eq!(zoomed(MIN_SCALE, 1.0), MIN_SCALE);
		assert!(zoomed(1.0, -1.0) > 1.0);
		assert!(zoomed(1.0, 1.0) < 1.0);
	}
}
