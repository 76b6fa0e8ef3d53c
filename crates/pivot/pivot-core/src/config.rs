//! Core configuration for pivot-core.

use serde::{Deserialize, Serialize};

use crate::data::Vec2;

/// What happens to the descendants of a non-root pivot dragged in Stretch mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StretchPolicy {
    /// Only the dragged pivot moves; the incoming bone changes length/angle.
    #[default]
    BoneOnly,
    /// Descendants are translated by the same delta as the dragged pivot.
    CarryDescendants,
}

/// Circular drop target used by the drag-to-delete gesture.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeleteZone {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Default for DeleteZone {
    fn default() -> Self {
        Self {
            x: 1230.0,
            y: 670.0,
            radius: 50.0,
        }
    }
}

impl DeleteZone {
    /// Inclusive hit test.
    pub fn contains(&self, p: Vec2) -> bool {
        let dx = p.x - self.x;
        let dy = p.y - self.y;
        (dx * dx + dy * dy).sqrt() <= self.radius
    }
}

/// Editor-wide settings. Defaults match the browser editor's store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Keyframes per second during playback. Values below 1 are treated as 1.
    pub fps: f64,
    /// Fraction of each keyframe step spent holding the current pose.
    pub hold_threshold: f64,
    /// Sampling rate used when baking for video export.
    pub export_fps: f64,
    pub stretch: StretchPolicy,
    pub delete_zone: DeleteZone,
    /// Vector lengths at or below this count as zero for angle math.
    pub epsilon: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 10.0,
            hold_threshold: 0.5,
            export_fps: 60.0,
            stretch: StretchPolicy::default(),
            delete_zone: DeleteZone::default(),
            epsilon: 1e-9,
        }
    }
}

impl Config {
    #[inline]
    pub fn effective_fps(&self) -> f64 {
        if self.fps.is_finite() {
            self.fps.max(1.0)
        } else {
            1.0
        }
    }

    #[inline]
    pub fn effective_hold(&self) -> f64 {
        if self.hold_threshold.is_nan() {
            0.0
        } else {
            self.hold_threshold.clamp(0.0, 1.0)
        }
    }
}
