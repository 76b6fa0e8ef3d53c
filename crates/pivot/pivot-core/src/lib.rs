//! Pivot Core (renderer-agnostic)
//!
//! Model and engines behind the pivot stick-figure animation editor: the
//! figure arena and its nested JSON form, the kinematic pose engine, frame
//! interpolation and playback sampling, the figure graph validator, builder
//! edits, library templates and the editor session store.

pub mod baking;
pub mod builder;
pub mod config;
pub mod data;
pub mod error;
pub mod figure;
pub mod ids;
pub mod interp;
pub mod nested;
pub mod playback;
pub mod pose;
pub mod sampling;
pub mod session;
pub mod templates;
pub mod validate;

// Re-exports for consumers (wasm binding, tests)
pub use baking::{bake_project, export_baked_json, export_frame_count, BakedAnimation, BakingConfig};
pub use config::{Config, DeleteZone, StretchPolicy};
pub use data::{Frame, Pivot, PivotKind, Project, Shape, ShapeKind, Vec2};
pub use error::PivotError;
pub use figure::Figure;
pub use ids::{FigureId, FrameId, IdAllocator, PivotId, ProjectId};
pub use interp::timing_t;
pub use nested::{figure_to_json, parse_figure_json, parse_project_json, project_to_json};
pub use playback::{sample, sample_from, PlaybackSample};
pub use pose::{apply_drag, apply_drag_with, rotation_center, InteractionMode, PoseOptions};
pub use sampling::{interpolate_figure, interpolate_frame, interpolate_pose, Pose};
pub use session::{check_project, Editor, IntegrityIssue};
pub use templates::Template;
pub use validate::{validate, ValidationError};
