//! Figure graph validator.
//!
//! Checks a builder figure for structural soundness. Every check runs and all
//! findings are returned; nothing here blocks in-memory edits. Callers decide
//! whether a non-empty list blocks save/export.
//!
//! Order of findings: root, emptiness, shape references and arity, isolated
//! pivots, disconnected pivots, joints inside rigid triangles.

use std::collections::VecDeque;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{PivotKind, ShapeKind};
use crate::figure::Figure;
use crate::ids::PivotId;

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("no root pivot is set")]
    NoRoot,

    #[error("figure has no shapes")]
    EmptyFigure,

    #[error("pivot {0} is not connected to any shape")]
    IsolatedPivot(PivotId),

    #[error("pivot {0} is not reachable from the rest of the figure")]
    Disconnected(PivotId),

    #[error("triangle #{shape} contains a joint pivot; triangles must be all fixed")]
    InvalidJoint { shape: usize },

    #[error("shape #{shape} references missing pivot {pivot}")]
    DanglingReference { shape: usize, pivot: PivotId },

    #[error("shape #{shape} ({kind:?}) has {count} pivots")]
    ShapeArity {
        shape: usize,
        kind: ShapeKind,
        count: usize,
    },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoRoot => "no_root",
            Self::EmptyFigure => "empty_figure",
            Self::IsolatedPivot(_) => "isolated_pivot",
            Self::Disconnected(_) => "disconnected",
            Self::InvalidJoint { .. } => "invalid_joint",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::ShapeArity { .. } => "shape_arity",
        }
    }

    /// Pivot the finding is about, if any.
    pub fn pivot_id(&self) -> Option<&str> {
        match self {
            Self::IsolatedPivot(id) | Self::Disconnected(id) => Some(id),
            Self::DanglingReference { pivot, .. } => Some(pivot),
            _ => None,
        }
    }
}

/// Validate `figure` against `root_id`. A root id that is not in the figure
/// counts as no root.
pub fn validate(figure: &Figure, root_id: Option<&str>) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !root_id.is_some_and(|r| figure.contains(r)) {
        errors.push(ValidationError::NoRoot);
    }
    if figure.shapes.is_empty() {
        errors.push(ValidationError::EmptyFigure);
    }

    let mut referenced: HashSet<&str> = HashSet::new();
    for (si, shape) in figure.shapes.iter().enumerate() {
        if !shape.kind.arity_ok(shape.pivot_ids.len()) {
            errors.push(ValidationError::ShapeArity {
                shape: si,
                kind: shape.kind,
                count: shape.pivot_ids.len(),
            });
        }
        let mut reported: HashSet<&str> = HashSet::new();
        for id in &shape.pivot_ids {
            if figure.contains(id) {
                referenced.insert(id.as_str());
            } else if reported.insert(id.as_str()) {
                errors.push(ValidationError::DanglingReference {
                    shape: si,
                    pivot: id.clone(),
                });
            }
        }
    }

    for p in figure.pivots() {
        if !referenced.contains(p.id.as_str()) {
            errors.push(ValidationError::IsolatedPivot(p.id.clone()));
        }
    }

    let reached = reachable_from_first_shape(figure);
    for p in figure.pivots() {
        let id = p.id.as_str();
        if referenced.contains(id) && !reached.contains(id) {
            errors.push(ValidationError::Disconnected(p.id.clone()));
        }
    }

    for (si, shape) in figure.shapes.iter().enumerate() {
        if shape.kind != ShapeKind::Polygon || shape.pivot_ids.len() != 3 {
            continue;
        }
        let has_joint = shape
            .pivot_ids
            .iter()
            .filter_map(|id| figure.pivot(id))
            .any(|p| p.kind == PivotKind::Joint);
        if has_joint {
            errors.push(ValidationError::InvalidJoint { shape: si });
        }
    }

    errors
}

/// Breadth-first walk over the undirected shape-edge graph, starting at the
/// first existing pivot referenced by any shape.
fn reachable_from_first_shape(figure: &Figure) -> HashSet<&str> {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for shape in &figure.shapes {
        for (a, b) in shape.edges() {
            if figure.contains(a) && figure.contains(b) {
                adjacency.entry(a).or_default().push(b);
                adjacency.entry(b).or_default().push(a);
            }
        }
    }

    let start = figure
        .shapes
        .iter()
        .flat_map(|s| s.pivot_ids.iter())
        .map(String::as_str)
        .find(|id| figure.contains(id));

    let mut seen: HashSet<&str> = HashSet::new();
    let Some(start) = start else {
        return seen;
    };
    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(cur) = queue.pop_front() {
        if let Some(next) = adjacency.get(cur) {
            for &n in next {
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
    }
    seen
}

impl Figure {
    /// Validate against this figure's own tree root.
    pub fn validate(&self) -> Vec<ValidationError> {
        validate(self, self.root().map(|p| p.id.as_str()))
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
