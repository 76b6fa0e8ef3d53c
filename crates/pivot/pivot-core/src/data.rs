//! Canonical pivot data model: points, pivots, shapes, frames and projects.
//! The figure arena and its tree walks live in figure.rs.

use serde::{Deserialize, Serialize};

use crate::figure::Figure;
use crate::ids::{FrameId, PivotId, ProjectId};

/// 2D point / vector in figure space.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }

    #[inline]
    pub fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, o: Vec2) -> f64 {
        self.sub(o).length()
    }

    /// Polar angle of `self` as seen from `center`. `None` when the two points
    /// coincide (within `eps`) and the angle is undefined.
    #[inline]
    pub fn angle_from(self, center: Vec2, eps: f64) -> Option<f64> {
        let d = self.sub(center);
        if d.length() <= eps {
            None
        } else {
            Some(d.y.atan2(d.x))
        }
    }

    /// Rotate `self` about `center` by `angle` radians.
    #[inline]
    pub fn rotate_about(self, center: Vec2, angle: f64) -> Vec2 {
        let (s, c) = angle.sin_cos();
        let d = self.sub(center);
        Vec2::new(center.x + d.x * c - d.y * s, center.y + d.x * s + d.y * c)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Joint pivots articulate independently; Fixed pivots ride rigidly on their
/// nearest Joint ancestor.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PivotKind {
    #[default]
    Joint,
    Fixed,
}

/// A named point of the skeleton. Topology lives in the owning [`Figure`].
#[derive(Clone, Debug, PartialEq)]
pub struct Pivot {
    pub id: PivotId,
    pub kind: PivotKind,
    pub pos: Vec2,
    /// Hidden pivots are not selectable and ignore drag gestures.
    pub hidden: bool,
    pub color: Option<String>,
}

impl Pivot {
    pub fn new(id: impl Into<PivotId>, kind: PivotKind, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            kind,
            pos: Vec2::new(x, y),
            hidden: false,
            color: None,
        }
    }

    pub fn joint(id: impl Into<PivotId>, x: f64, y: f64) -> Self {
        Self::new(id, PivotKind::Joint, x, y)
    }

    pub fn fixed(id: impl Into<PivotId>, x: f64, y: f64) -> Self {
        Self::new(id, PivotKind::Fixed, x, y)
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.kind == PivotKind::Fixed
    }
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Two pivots.
    Line,
    /// Two pivots forming a diameter.
    Circle,
    /// Three or more pivots, closed.
    Polygon,
    /// Quadratic: start, control, end.
    Curve,
}

impl ShapeKind {
    pub fn arity_ok(self, count: usize) -> bool {
        match self {
            ShapeKind::Line | ShapeKind::Circle => count == 2,
            ShapeKind::Curve => count == 3,
            ShapeKind::Polygon => count >= 3,
        }
    }
}

/// Drawable primitive over an ordered list of pivot ids.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(rename = "pivotIds")]
    pub pivot_ids: Vec<PivotId>,
}

impl Shape {
    pub fn new(kind: ShapeKind, pivot_ids: Vec<PivotId>) -> Self {
        Self {
            kind,
            color: None,
            pivot_ids,
        }
    }

    pub fn line(a: &str, b: &str) -> Self {
        Self::new(ShapeKind::Line, vec![a.to_string(), b.to_string()])
    }

    pub fn references(&self, id: &str) -> bool {
        self.pivot_ids.iter().any(|p| p == id)
    }

    /// Undirected edges this shape contributes to the connectivity graph.
    /// Lines, circles and curves chain consecutive ids; polygons close the cycle.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let ids = &self.pivot_ids;
        let mut out: Vec<(&str, &str)> = ids
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
            .collect();
        if self.kind == ShapeKind::Polygon && ids.len() >= 3 {
            out.push((ids[ids.len() - 1].as_str(), ids[0].as_str()));
        }
        out
    }
}

/// One keyframe: figures in render (z) order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Frame {
    pub id: FrameId,
    #[serde(default)]
    pub figures: Vec<Figure>,
}

impl Frame {
    pub fn new(id: impl Into<FrameId>) -> Self {
        Self {
            id: id.into(),
            figures: Vec::new(),
        }
    }

    pub fn figure(&self, id: &str) -> Option<&Figure> {
        self.figures.iter().find(|f| f.id == id)
    }

    pub fn figure_mut(&mut self, id: &str) -> Option<&mut Figure> {
        self.figures.iter_mut().find(|f| f.id == id)
    }

    /// Index of the first figure owning `pivot_id`.
    pub fn figure_owning(&self, pivot_id: &str) -> Option<usize> {
        self.figures.iter().position(|f| f.contains(pivot_id))
    }
}

/// Saved project (`.psproject`).
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub frames: Vec<Frame>,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: &str, first_frame: impl Into<FrameId>) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            description: String::new(),
            frames: vec![Frame::new(first_frame)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "left={a} right={b}");
    }

    #[test]
    fn rotate_about_quarter_turn() {
        let p = Vec2::new(2.0, 1.0).rotate_about(Vec2::new(1.0, 1.0), FRAC_PI_2);
        approx(p.x, 1.0);
        approx(p.y, 2.0);
    }

    #[test]
    fn angle_undefined_at_center() {
        let c = Vec2::new(3.0, 4.0);
        assert_eq!(c.angle_from(c, 1e-9), None);
        approx(Vec2::new(3.0, 5.0).angle_from(c, 1e-9).unwrap(), FRAC_PI_2);
    }

    #[test]
    fn shape_edges_per_kind() {
        let ids = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let curve = Shape::new(ShapeKind::Curve, ids(&["a", "b", "c"]));
        assert_eq!(curve.edges(), vec![("a", "b"), ("b", "c")]);
        let poly = Shape::new(ShapeKind::Polygon, ids(&["a", "b", "c"]));
        assert_eq!(poly.edges(), vec![("a", "b"), ("b", "c"), ("c", "a")]);
        let circle = Shape::new(ShapeKind::Circle, ids(&["a", "b"]));
        assert_eq!(circle.edges(), vec![("a", "b")]);
    }

    #[test]
    fn shape_json_matches_editor_format() {
        let shape: Shape =
            serde_json::from_str(r#"{ "type": "curve", "pivotIds": ["a", "b", "c"] }"#).unwrap();
        assert_eq!(shape.kind, ShapeKind::Curve);
        assert!(shape.color.is_none());
        assert!(!ShapeKind::Line.arity_ok(3));
        assert!(ShapeKind::Polygon.arity_ok(5));
    }
}
