//! Playback sampling: the displayed frame at a point in playback time.
//!
//! Keyframe `i` occupies `[i / fps, (i + 1) / fps)` seconds. Inside a step the
//! raw progress goes through the hold-then-ease curve before interpolating
//! towards keyframe `i + 1`. Playback ends on the last keyframe.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Frame, Project};
use crate::interp::functions::timing_t;
use crate::sampling::interpolate_frame;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSample {
    /// Keyframe being held or eased out of.
    pub frame_index: usize,
    /// Keyframe being eased into; `None` while holding.
    pub target_index: Option<usize>,
    /// Progress in the current step before the timing curve.
    pub raw_progress: f64,
    /// Interpolation parameter after the timing curve.
    pub t: f64,
    /// True once playback reached the last keyframe.
    pub finished: bool,
    pub frame: Frame,
}

/// Sample `project` at `elapsed_secs` since playback started on the first
/// keyframe. Returns `None` for a project without frames.
pub fn sample(project: &Project, elapsed_secs: f64, cfg: &Config) -> Option<PlaybackSample> {
    sample_from(project, 0, elapsed_secs, cfg)
}

/// Sample `project` at `elapsed_secs` since playback started on keyframe
/// `start_index`. A start past the end is treated as the last keyframe.
pub fn sample_from(
    project: &Project,
    start_index: usize,
    elapsed_secs: f64,
    cfg: &Config,
) -> Option<PlaybackSample> {
    let frames = &project.frames;
    let last = frames.len().checked_sub(1)?;
    let elapsed = if elapsed_secs.is_finite() {
        elapsed_secs.max(0.0)
    } else {
        0.0
    };
    let steps = start_index.min(last) as f64 + elapsed * cfg.effective_fps();
    let index = steps.floor();
    if index >= last as f64 {
        return Some(PlaybackSample {
            frame_index: last,
            target_index: None,
            raw_progress: 0.0,
            t: 0.0,
            finished: true,
            frame: frames[last].clone(),
        });
    }

    let frame_index = index as usize;
    let raw_progress = steps - index;
    let hold = cfg.effective_hold();
    let t = timing_t(raw_progress, hold);
    let target_index = (raw_progress > hold).then_some(frame_index + 1);
    let frame = interpolate_frame(&frames[frame_index], &frames[frame_index + 1], t);
    Some(PlaybackSample {
        frame_index,
        target_index,
        raw_progress,
        t,
        finished: false,
        frame,
    })
}

/// Total playback length: one step per keyframe transition.
pub fn duration_secs(frame_count: usize, fps: f64) -> f64 {
    let fps = if fps.is_finite() { fps.max(1.0) } else { 1.0 };
    frame_count.saturating_sub(1) as f64 / fps
}
