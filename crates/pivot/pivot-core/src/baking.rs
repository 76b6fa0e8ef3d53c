//! Baking API: sample a project's playback at a fixed rate for video export.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Frame, Project};
use crate::error::PivotError;
use crate::playback::{duration_secs, sample};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakingConfig {
    /// Keyframes per second of the source animation.
    pub playback_fps: f64,
    /// Output frames per second.
    pub export_fps: f64,
    pub hold_threshold: f64,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for BakingConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            playback_fps: cfg.fps,
            export_fps: cfg.export_fps,
            hold_threshold: cfg.hold_threshold,
        }
    }
}

impl BakingConfig {
    fn export_rate(&self) -> f64 {
        if self.export_fps.is_finite() && self.export_fps > 0.0 {
            self.export_fps.max(1.0)
        } else {
            60.0
        }
    }

    fn playback_config(&self) -> Config {
        Config {
            fps: self.playback_fps,
            hold_threshold: self.hold_threshold,
            ..Config::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedAnimation {
    pub fps: f64,
    pub duration_secs: f64,
    pub frames: Vec<Frame>,
}

/// Export length in seconds for `frame_count` keyframes.
pub fn export_duration_secs(frame_count: usize, cfg: &BakingConfig) -> f64 {
    duration_secs(frame_count, cfg.playback_fps)
}

/// Number of output frames: `ceil(duration * export_fps)`.
pub fn export_frame_count(frame_count: usize, cfg: &BakingConfig) -> usize {
    let playback = cfg.playback_config().effective_fps();
    // Multiply before dividing so whole-frame exports stay exact.
    let frames = frame_count.saturating_sub(1) as f64 * cfg.export_rate() / playback;
    frames.ceil() as usize
}

/// Bake every output frame of `project`. Samples `0..=export_frame_count`
/// so the export ends on the last keyframe; a non-empty project always
/// yields at least one frame.
pub fn bake_project(project: &Project, cfg: &BakingConfig) -> BakedAnimation {
    let rate = cfg.export_rate();
    let playback = cfg.playback_config();
    let count = export_frame_count(project.frames.len(), cfg);
    let frames = (0..=count)
        .filter_map(|i| sample(project, i as f64 / rate, &playback))
        .map(|s| s.frame)
        .collect();
    BakedAnimation {
        fps: rate,
        duration_secs: export_duration_secs(project.frames.len(), cfg),
        frames,
    }
}

pub fn export_baked_json(baked: &BakedAnimation) -> Result<serde_json::Value, PivotError> {
    Ok(serde_json::to_value(baked)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_count_matches_export_dialog() {
        let cfg = BakingConfig {
            playback_fps: 10.0,
            export_fps: 60.0,
            hold_threshold: 0.5,
        };
        // (4 - 1) / 10 = 0.3 s -> 18 frames
        assert_eq!(export_frame_count(4, &cfg), 18);
        assert_eq!(export_frame_count(1, &cfg), 0);
        assert_eq!(export_frame_count(0, &cfg), 0);
    }

    #[test]
    fn bakes_requested_count() {
        let mut project = Project::new("p", "bake", "k0");
        project.frames.push(Frame::new("k1"));
        let baked = bake_project(&project, &BakingConfig::default());
        assert_eq!(baked.frames.len(), 7);
        assert_eq!(baked.fps, 60.0);
        assert_eq!(baked.frames[6], project.frames[1]);
        let json = export_baked_json(&baked).unwrap();
        assert_eq!(json["frames"].as_array().map(|a| a.len()), Some(7));
    }

    #[test]
    fn single_keyframe_bakes_one_frame() {
        let project = Project::new("p", "still", "k0");
        let baked = bake_project(&project, &BakingConfig::default());
        assert_eq!(baked.frames.len(), 1);
        assert!(bake_project(&Project::default(), &BakingConfig::default())
            .frames
            .is_empty());
    }
}
