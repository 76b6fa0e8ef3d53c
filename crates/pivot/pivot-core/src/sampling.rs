//! Frame interpolation: poses between two keyframes.
//!
//! Model:
//! - Figures and pivots are matched by id, never by tree position.
//! - A pivot present in A but not in B keeps A's position; a figure present in
//!   A but not in B is held at A's pose.
//! - The geometric step (`interpolate_pose`) produces positions only. Shapes,
//!   kinds and style are re-merged from A via [`Figure::with_pose`].

use hashbrown::HashMap;
use log::trace;

use crate::data::{Frame, Vec2};
use crate::figure::Figure;
use crate::ids::PivotId;
use crate::interp::functions::{clamp01, lerp_vec2};

/// Position-only output keyed by pivot id.
pub type Pose = HashMap<PivotId, Vec2>;

/// Positions of `a` moved towards `b` by `t` (clamped to [0,1]).
pub fn interpolate_pose(a: &Figure, b: &Figure, t: f64) -> Pose {
    let t = clamp01(t);
    a.pivots()
        .iter()
        .map(|pa| {
            let pos = match b.pivot(&pa.id) {
                Some(pb) => lerp_vec2(pa.pos, pb.pos, t),
                None => pa.pos,
            };
            (pa.id.clone(), pos)
        })
        .collect()
}

/// `a` with its positions interpolated towards `b`.
pub fn interpolate_figure(a: &Figure, b: &Figure, t: f64) -> Figure {
    a.with_pose(&interpolate_pose(a, b, t))
}

/// Interpolated frame between keyframes `a` and `b`. Figures follow A's order.
pub fn interpolate_frame(a: &Frame, b: &Frame, t: f64) -> Frame {
    let figures = a
        .figures
        .iter()
        .map(|fa| match b.figure(&fa.id) {
            Some(fb) => interpolate_figure(fa, fb, t),
            None => {
                trace!("figure {} missing from frame {}; holding", fa.id, b.id);
                fa.clone()
            }
        })
        .collect();
    Frame {
        id: format!("{}-interpolated", a.id),
        figures,
    }
}
