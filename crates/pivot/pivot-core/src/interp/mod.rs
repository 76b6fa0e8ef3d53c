//! Interpolation helpers and the hold-then-ease timing curve.

pub mod functions;

pub use functions::{clamp01, lerp, lerp_vec2, step_progress, timing_t};
