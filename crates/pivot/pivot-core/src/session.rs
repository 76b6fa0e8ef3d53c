//! Editor session: the project being animated plus timeline/playback state.
//!
//! Methods:
//! - add_frame, delete_frame, set_current_frame (timeline)
//! - upsert_figure, add_template, release_figure_at (figures in the current frame)
//! - drag_pivot (pose engine on the current frame)
//! - toggle_play, advance (playback clock)
//! - check_integrity (aliasing and id uniqueness across frames)

use hashbrown::HashSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::data::{Frame, Project, Vec2};
use crate::error::PivotError;
use crate::figure::Figure;
use crate::ids::{FigureId, FrameId, IdAllocator, PivotId};
use crate::playback::{sample_from, PlaybackSample};
use crate::pose::{apply_drag_in_frame, InteractionMode, PoseOptions};
use crate::templates::Template;

/// A problem found by [`Editor::check_integrity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityIssue {
    DuplicateFrameId {
        frame: FrameId,
    },
    DuplicateFigureId {
        frame: FrameId,
        figure: FigureId,
    },
    /// Same pivot id owned by two figures of one frame.
    DuplicatePivotId {
        frame: FrameId,
        pivot: PivotId,
    },
    /// Two figures point at the same pivot or shape storage.
    SharedStorage {
        frame_a: FrameId,
        frame_b: FrameId,
        figure: FigureId,
    },
}

#[derive(Debug)]
pub struct Editor {
    pub project: Project,
    pub current_frame: usize,
    pub playing: bool,
    pub mode: InteractionMode,
    pub config: Config,
    ids: IdAllocator,
    play_start: usize,
    play_elapsed: f64,
}

impl Editor {
    /// Fresh session with a single empty keyframe.
    pub fn new(name: &str, config: Config) -> Self {
        let mut ids = IdAllocator::new();
        let project = Project::new(ids.project(), name, ids.frame());
        Self::with_project(project, config, ids)
    }

    /// Open an existing project. An empty frame list gets one empty keyframe.
    pub fn with_project(mut project: Project, config: Config, mut ids: IdAllocator) -> Self {
        if project.frames.is_empty() {
            project.frames.push(Frame::new(ids.frame()));
        }
        Self {
            project,
            current_frame: 0,
            playing: false,
            mode: InteractionMode::default(),
            config,
            ids,
            play_start: 0,
            play_elapsed: 0.0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.project.frames.len()
    }

    pub fn current(&self) -> &Frame {
        &self.project.frames[self.current_frame]
    }

    fn current_mut(&mut self) -> &mut Frame {
        &mut self.project.frames[self.current_frame]
    }

    /// Append a deep copy of the last keyframe and select it.
    pub fn add_frame(&mut self) -> FrameId {
        let id = self.ids.frame();
        let mut frame = self
            .project
            .frames
            .last()
            .cloned()
            .unwrap_or_default();
        frame.id = id.clone();
        self.project.frames.push(frame);
        self.current_frame = self.project.frames.len() - 1;
        debug!("added frame {id} ({} total)", self.project.frames.len());
        id
    }

    /// Delete keyframe `index`. The last remaining keyframe is kept; returns
    /// false in that case.
    pub fn delete_frame(&mut self, index: usize) -> Result<bool, PivotError> {
        let len = self.project.frames.len();
        if index >= len {
            return Err(PivotError::UnknownFrame { index, len });
        }
        if len == 1 {
            return Ok(false);
        }
        self.project.frames.remove(index);
        if self.current_frame >= index && self.current_frame > 0 {
            self.current_frame -= 1;
        }
        Ok(true)
    }

    pub fn set_current_frame(&mut self, index: usize) -> Result<(), PivotError> {
        let len = self.project.frames.len();
        if index >= len {
            return Err(PivotError::UnknownFrame { index, len });
        }
        self.current_frame = index;
        Ok(())
    }

    /// Replace the figure with the same id in the current frame, or append it.
    pub fn upsert_figure(&mut self, figure: Figure) {
        let frame = self.current_mut();
        match frame.figures.iter_mut().find(|f| f.id == figure.id) {
            Some(slot) => *slot = figure,
            None => frame.figures.push(figure),
        }
    }

    /// Instantiate a library template into the current frame.
    pub fn add_template(&mut self, template: Template) -> FigureId {
        let figure = template.instantiate(&mut self.ids);
        let id = figure.id.clone();
        self.upsert_figure(figure);
        id
    }

    /// Remove `figure_id` from the current frame when released inside the
    /// delete zone. Returns whether the figure was removed.
    pub fn release_figure_at(&mut self, figure_id: &str, point: Vec2) -> Result<bool, PivotError> {
        if !self.config.delete_zone.contains(point) {
            return Ok(false);
        }
        let frame = self.current_mut();
        let before = frame.figures.len();
        frame.figures.retain(|f| f.id != figure_id);
        if frame.figures.len() == before {
            return Err(PivotError::UnknownFigure(figure_id.to_string()));
        }
        debug!("figure {figure_id} dropped on delete zone");
        Ok(true)
    }

    /// Drag `pivot_id` in the current frame using the session mode. Ignored
    /// during playback.
    pub fn drag_pivot(&mut self, pivot_id: &str, target: Vec2) {
        if self.playing {
            debug!("drag on {pivot_id} ignored during playback");
            return;
        }
        let opts = PoseOptions::from(&self.config);
        let next = apply_drag_in_frame(self.current(), pivot_id, target, self.mode, &opts);
        *self.current_mut() = next;
    }

    /// Start or stop playback. Playback starts from the current keyframe.
    pub fn toggle_play(&mut self) -> bool {
        self.playing = !self.playing;
        self.play_start = self.current_frame;
        self.play_elapsed = 0.0;
        self.playing
    }

    /// Advance the playback clock by `dt_secs` and return the displayed frame.
    /// The current keyframe follows playback, which stops by itself on the
    /// last keyframe.
    pub fn advance(&mut self, dt_secs: f64) -> Option<PlaybackSample> {
        if !self.playing {
            return None;
        }
        if dt_secs.is_finite() && dt_secs > 0.0 {
            self.play_elapsed += dt_secs;
        }
        let s = sample_from(&self.project, self.play_start, self.play_elapsed, &self.config)?;
        self.current_frame = s.frame_index;
        if s.finished {
            self.playing = false;
        }
        Some(s)
    }

    /// Check that frames are independent copies and ids are unique.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let issues = check_project(&self.project);
        for issue in &issues {
            warn!("integrity: {issue:?}");
        }
        issues
    }
}

/// Integrity scan over a whole project.
pub fn check_project(project: &Project) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let mut frame_ids: HashSet<&str> = HashSet::new();
    for frame in &project.frames {
        if !frame_ids.insert(frame.id.as_str()) {
            issues.push(IntegrityIssue::DuplicateFrameId {
                frame: frame.id.clone(),
            });
        }
        let mut figure_ids: HashSet<&str> = HashSet::new();
        let mut pivot_ids: HashSet<&str> = HashSet::new();
        for fig in &frame.figures {
            if !figure_ids.insert(fig.id.as_str()) {
                issues.push(IntegrityIssue::DuplicateFigureId {
                    frame: frame.id.clone(),
                    figure: fig.id.clone(),
                });
            }
            for p in fig.pivots() {
                if !pivot_ids.insert(p.id.as_str()) {
                    issues.push(IntegrityIssue::DuplicatePivotId {
                        frame: frame.id.clone(),
                        pivot: p.id.clone(),
                    });
                }
            }
        }
    }

    // Empty vectors share a dangling pointer, so only non-empty storage counts.
    let mut seen: Vec<(*const (), &str)> = Vec::new();
    for frame in &project.frames {
        for fig in &frame.figures {
            let mut ptrs: Vec<*const ()> = Vec::with_capacity(2);
            if !fig.pivots().is_empty() {
                ptrs.push(fig.pivots().as_ptr().cast());
            }
            if !fig.shapes.is_empty() {
                ptrs.push(fig.shapes.as_ptr().cast());
            }
            for ptr in ptrs {
                if let Some((_, other)) = seen.iter().find(|(p, _)| std::ptr::eq(*p, ptr)) {
                    issues.push(IntegrityIssue::SharedStorage {
                        frame_a: (*other).to_string(),
                        frame_b: frame.id.clone(),
                        figure: fig.id.clone(),
                    });
                } else {
                    seen.push((ptr, frame.id.as_str()));
                }
            }
        }
    }
    issues
}
