//! Errors for fallible builder and persistence calls.
//!
//! The pose, interpolation and validation engines never return these; they
//! skip malformed references instead.

use thiserror::Error;

use crate::data::ShapeKind;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum PivotError {
    #[error("pivot not found: {0}")]
    UnknownPivot(String),

    #[error("duplicate pivot id: {0}")]
    DuplicatePivot(String),

    #[error("shape index {index} out of range ({len} shapes)")]
    UnknownShape { index: usize, len: usize },

    #[error("{kind:?} shape cannot reference {count} pivots")]
    ShapeArity { kind: ShapeKind, count: usize },

    #[error("attaching {child} under {parent} would create a cycle")]
    WouldCycle { parent: String, child: String },

    #[error("root pivot {0} cannot be removed while other pivots remain")]
    RootRemoval(String),

    #[error("figure not found: {0}")]
    UnknownFigure(String),

    #[error("frame index {index} out of range ({len} frames)")]
    UnknownFrame { index: usize, len: usize },

    #[error("json error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for PivotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl PivotError {
    /// Category string for UI surfaces and logs.
    pub fn category(&self) -> &'static str {
        match self {
            Self::UnknownPivot(_) | Self::UnknownShape { .. } | Self::UnknownFigure(_) => {
                "reference"
            }
            Self::UnknownFrame { .. } => "timeline",
            Self::DuplicatePivot(_)
            | Self::ShapeArity { .. }
            | Self::WouldCycle { .. }
            | Self::RootRemoval(_) => "structure",
            Self::Json(_) => "serialization",
        }
    }
}
