//! Interpolation helpers:
//! - lerp / lerp_vec2 (positions)
//! - timing_t (hold-then-ease curve over one keyframe step)
//! - step_progress (elapsed milliseconds -> raw progress in the step)

use crate::data::Vec2;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    Vec2::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

/// Clamp to [0,1]; NaN maps to 0.
#[inline]
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Hold-then-ease timing: the pose is held for `hold_threshold` of the step,
/// then eased linearly into the next keyframe over the remainder.
///
/// The result is clamped to [0,1] and ready to pass to the interpolators.
#[inline]
pub fn timing_t(raw_progress: f64, hold_threshold: f64) -> f64 {
    let raw = clamp01(raw_progress);
    let hold = clamp01(hold_threshold);
    if hold >= 1.0 || raw <= hold {
        return 0.0;
    }
    clamp01((raw - hold) / (1.0 - hold))
}

/// Raw progress inside one keyframe step: `min(elapsed / (1000 / fps), 1)`.
/// `fps` below 1 (or non-finite) is treated as 1.
#[inline]
pub fn step_progress(elapsed_ms: f64, fps: f64) -> f64 {
    let fps = if fps.is_finite() { fps.max(1.0) } else { 1.0 };
    let duration_ms = 1000.0 / fps;
    clamp01(elapsed_ms / duration_ms)
}
