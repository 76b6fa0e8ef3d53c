//! Kinematic pose engine: applies a single drag gesture to a figure.
//!
//! Every entry point takes `&Figure` and returns a new owned `Figure` with
//! the same topology and only positions changed. Unknown or hidden pivots and
//! non-finite targets leave the figure as it was.
//!
//! Modes:
//! - Rotate: articulated rig. Root drags translate the whole figure; other
//!   pivots swing about their rotation center (nearest Joint ancestor, skipping
//!   Fixed connectors) so bone lengths are kept.
//! - Stretch: the dragged pivot moves freely, reshaping its incoming bone.
//! - Flip: mirror about the root's x, regardless of which pivot was clicked.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Config, StretchPolicy};
use crate::data::{Frame, Vec2};
use crate::figure::Figure;
use crate::ids::PivotId;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    #[default]
    Rotate,
    Stretch,
    Flip,
}

/// Tunables for the pose engine, usually taken from [`Config`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoseOptions {
    pub stretch: StretchPolicy,
    pub epsilon: f64,
}

impl Default for PoseOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PoseOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            stretch: cfg.stretch,
            epsilon: cfg.epsilon,
        }
    }
}

/// Result of the Fixed-chain walk for a dragged pivot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationCenter {
    /// Nearest Joint ancestor (or the root) the drag rotates about.
    pub center: PivotId,
    /// Highest Fixed ancestor just below `center`, when a Fixed chain lies
    /// between the dragged pivot and its rotation center.
    pub group_root: Option<PivotId>,
}

/// Apply a drag gesture with default options.
pub fn apply_drag(figure: &Figure, pivot_id: &str, target: Vec2, mode: InteractionMode) -> Figure {
    apply_drag_with(figure, pivot_id, target, mode, &PoseOptions::default())
}

pub fn apply_drag_with(
    figure: &Figure,
    pivot_id: &str,
    target: Vec2,
    mode: InteractionMode,
    opts: &PoseOptions,
) -> Figure {
    let Some(idx) = figure.index_of(pivot_id) else {
        debug!("drag ignored: pivot {pivot_id} not in figure {}", figure.id);
        return figure.clone();
    };
    if figure.pivot_at(idx).hidden {
        debug!("drag ignored: pivot {pivot_id} is hidden");
        return figure.clone();
    }
    if mode == InteractionMode::Flip {
        return flip_figure(figure);
    }
    if !target.is_finite() {
        warn!("drag ignored: non-finite target ({}, {})", target.x, target.y);
        return figure.clone();
    }

    let mut out = figure.clone();
    if out.parent_index(idx).is_none() {
        translate_subtree_to(&mut out, idx, target);
    } else if mode == InteractionMode::Rotate {
        rotate_in_place(&mut out, idx, target, opts.epsilon);
    } else {
        stretch_in_place(&mut out, idx, target, opts.stretch);
    }
    out
}

/// Apply a drag to the first figure of `frame` owning `pivot_id`.
pub fn apply_drag_in_frame(
    frame: &Frame,
    pivot_id: &str,
    target: Vec2,
    mode: InteractionMode,
    opts: &PoseOptions,
) -> Frame {
    let mut out = frame.clone();
    if let Some(i) = frame.figure_owning(pivot_id) {
        out.figures[i] = apply_drag_with(&frame.figures[i], pivot_id, target, mode, opts);
    }
    out
}

/// Move the root to `target`, carrying every descendant by the same delta.
pub fn translate_figure(figure: &Figure, target: Vec2) -> Figure {
    let mut out = figure.clone();
    if let Some(root) = out.root_index() {
        if target.is_finite() {
            translate_subtree_to(&mut out, root, target);
        }
    }
    out
}

/// Rotate-mode drag on a non-root pivot.
pub fn rotate_pivot(figure: &Figure, pivot_id: &str, target: Vec2, epsilon: f64) -> Figure {
    let mut out = figure.clone();
    if let Some(idx) = out.index_of(pivot_id) {
        if target.is_finite() {
            rotate_in_place(&mut out, idx, target, epsilon);
        }
    }
    out
}

/// Stretch-mode drag on a non-root pivot.
pub fn stretch_pivot(
    figure: &Figure,
    pivot_id: &str,
    target: Vec2,
    policy: StretchPolicy,
) -> Figure {
    let mut out = figure.clone();
    if let Some(idx) = out.index_of(pivot_id) {
        if target.is_finite() {
            stretch_in_place(&mut out, idx, target, policy);
        }
    }
    out
}

/// Mirror every non-root pivot horizontally about the root's x.
pub fn flip_figure(figure: &Figure) -> Figure {
    let mut out = figure.clone();
    let Some(root) = out.root_index() else {
        return out;
    };
    let root_x = out.pos(root).x;
    for i in 0..out.len() {
        if i == root {
            continue;
        }
        let p = out.pos(i);
        out.set_pos(i, Vec2::new(2.0 * root_x - p.x, p.y));
    }
    trace!("flipped figure {} about x={root_x}", out.id);
    out
}

/// Fixed-chain walk for `pivot_id`. `None` for unknown ids and roots.
pub fn rotation_center(figure: &Figure, pivot_id: &str) -> Option<RotationCenter> {
    let idx = figure.index_of(pivot_id)?;
    let parent = figure.parent_index(idx)?;
    let (center, group_root) = walk_to_center(figure, parent);
    Some(RotationCenter {
        center: figure.pivot_at(center).id.clone(),
        group_root: group_root.map(|g| figure.pivot_at(g).id.clone()),
    })
}

// --- internals ------------------------------------------------------------

/// From the immediate parent, climb while the current ancestor is Fixed and
/// has a parent of its own. Returns (rotation center, group root).
fn walk_to_center(fig: &Figure, parent: usize) -> (usize, Option<usize>) {
    let mut center = parent;
    let mut group_root = None;
    let mut steps = 0;
    while fig.pivot_at(center).is_fixed() {
        let Some(up) = fig.parent_index(center) else {
            break;
        };
        if steps >= fig.len() {
            break;
        }
        steps += 1;
        group_root = Some(center);
        center = up;
    }
    (center, group_root)
}

/// Signed angle carrying `current` onto the ray towards `target`, both seen
/// from `center`. Zero when either angle is undefined.
fn delta_angle(current: Vec2, target: Vec2, center: Vec2, eps: f64) -> f64 {
    match (target.angle_from(center, eps), current.angle_from(center, eps)) {
        (Some(to), Some(from)) => {
            let d = to - from;
            d.sin().atan2(d.cos())
        }
        _ => 0.0,
    }
}

fn rotate_subtree(fig: &mut Figure, idx: usize, center: Vec2, angle: f64) {
    for i in fig.subtree_indices(idx) {
        let p = fig.pos(i);
        fig.set_pos(i, p.rotate_about(center, angle));
    }
}

fn fixed_siblings(fig: &Figure, parent: usize, except: usize) -> Vec<usize> {
    fig.child_indices(parent)
        .into_iter()
        .filter(|&c| c != except && fig.pivot_at(c).is_fixed())
        .collect()
}

fn rotate_in_place(fig: &mut Figure, idx: usize, target: Vec2, eps: f64) {
    let Some(parent) = fig.parent_index(idx) else {
        translate_subtree_to(fig, idx, target);
        return;
    };
    let (center, group_root) = walk_to_center(fig, parent);
    let center_pos = fig.pos(center);
    let delta = delta_angle(fig.pos(idx), target, center_pos, eps);
    if delta == 0.0 {
        trace!("rotate on {} is a no-op", fig.pivot_at(idx).id);
        return;
    }

    match group_root {
        None => {
            // The immediate parent is the rotation center: swing the dragged
            // subtree and any rigid attachments sharing that parent.
            rotate_subtree(fig, idx, center_pos, delta);
            for sib in fixed_siblings(fig, parent, idx) {
                rotate_subtree(fig, sib, center_pos, delta);
            }
        }
        Some(group) => {
            // A Fixed chain sits between: the whole rigid group turns about
            // the joint, together with Fixed siblings of the group root.
            rotate_subtree(fig, group, center_pos, delta);
            for sib in fixed_siblings(fig, center, group) {
                rotate_subtree(fig, sib, center_pos, delta);
            }
        }
    }
    trace!(
        "rotated {} by {delta:.4} rad about {}",
        fig.pivot_at(idx).id,
        fig.pivot_at(center).id
    );
}

fn stretch_in_place(fig: &mut Figure, idx: usize, target: Vec2, policy: StretchPolicy) {
    let delta = target.sub(fig.pos(idx));
    match policy {
        StretchPolicy::BoneOnly => fig.set_pos(idx, target),
        StretchPolicy::CarryDescendants => {
            for i in fig.subtree_indices(idx) {
                if i == idx {
                    fig.set_pos(i, target);
                } else {
                    let p = fig.pos(i);
                    fig.set_pos(i, p.add(delta));
                }
            }
        }
    }
}

fn translate_subtree_to(fig: &mut Figure, idx: usize, target: Vec2) {
    let delta = target.sub(fig.pos(idx));
    for i in fig.subtree_indices(idx) {
        if i == idx {
            fig.set_pos(i, target);
        } else {
            let p = fig.pos(i);
            fig.set_pos(i, p.add(delta));
        }
    }
}
