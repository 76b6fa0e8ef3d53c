//! Ready-made skeletons offered by the model library.

use serde::{Deserialize, Serialize};

use crate::data::{Pivot, PivotKind, Shape, ShapeKind};
use crate::figure::Figure;
use crate::ids::{IdAllocator, PivotId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Template {
    Stickman,
    SimpleStick,
    Curve,
    Circle,
}

impl Template {
    pub fn instantiate(self, ids: &mut IdAllocator) -> Figure {
        match self {
            Template::Stickman => stickman(ids),
            Template::SimpleStick => simple_stick(ids),
            Template::Curve => curve(ids),
            Template::Circle => circle(ids),
        }
    }
}

struct Spec<'a> {
    role: &'a str,
    kind: PivotKind,
    x: f64,
    y: f64,
    parent: Option<&'a str>,
}

const fn joint<'a>(role: &'a str, x: f64, y: f64, parent: Option<&'a str>) -> Spec<'a> {
    Spec {
        role,
        kind: PivotKind::Joint,
        x,
        y,
        parent,
    }
}

fn assemble(ids: &mut IdAllocator, specs: &[Spec], shapes: &[(ShapeKind, &[&str])]) -> Figure {
    let group = ids.group();
    let figure_id = ids.figure();
    let named = |role: &str| -> PivotId { ids.named_pivot(group, role) };
    let mut entries = Vec::with_capacity(specs.len());
    for s in specs {
        let pivot = Pivot::new(named(s.role), s.kind, s.x, s.y);
        entries.push((pivot, s.parent.map(named)));
    }
    let shapes = shapes
        .iter()
        .map(|(kind, roles)| Shape::new(*kind, roles.iter().map(|r| named(*r)).collect()))
        .collect();
    // Only a broken template table can fail here.
    Figure::from_parts(figure_id.clone(), entries, shapes).unwrap_or_else(|err| {
        log::warn!("template assembly failed: {err}");
        Figure::new(figure_id)
    })
}

/// Hip-rooted stick figure: torso, circular head, two arms, two legs.
pub fn stickman(ids: &mut IdAllocator) -> Figure {
    use ShapeKind::{Circle, Line};
    let specs = [
        joint("hip", 400.0, 350.0, None),
        joint("shoulder", 400.0, 270.0, Some("hip")),
        joint("head-top", 400.0, 230.0, Some("shoulder")),
        joint("le", 372.0, 298.0, Some("shoulder")),
        joint("lh", 344.0, 326.0, Some("le")),
        joint("re", 428.0, 298.0, Some("shoulder")),
        joint("rh", 456.0, 326.0, Some("re")),
        joint("lk", 370.0, 390.0, Some("hip")),
        joint("lf", 370.0, 430.0, Some("lk")),
        joint("rk", 430.0, 390.0, Some("hip")),
        joint("rf", 430.0, 430.0, Some("rk")),
    ];
    let shapes: [(ShapeKind, &[&str]); 10] = [
        (Line, &["hip", "shoulder"]),
        (Circle, &["shoulder", "head-top"]),
        (Line, &["shoulder", "le"]),
        (Line, &["le", "lh"]),
        (Line, &["shoulder", "re"]),
        (Line, &["re", "rh"]),
        (Line, &["hip", "lk"]),
        (Line, &["lk", "lf"]),
        (Line, &["hip", "rk"]),
        (Line, &["rk", "rf"]),
    ];
    assemble(ids, &specs, &shapes)
}

pub fn simple_stick(ids: &mut IdAllocator) -> Figure {
    let specs = [
        joint("root", 400.0, 300.0, None),
        joint("end", 400.0, 200.0, Some("root")),
    ];
    let shapes: [(ShapeKind, &[&str]); 1] = [(ShapeKind::Line, &["root", "end"])];
    assemble(ids, &specs, &shapes)
}

/// Quadratic curve whose control point is a Fixed pivot.
pub fn curve(ids: &mut IdAllocator) -> Figure {
    let specs = [
        joint("root", 350.0, 300.0, None),
        Spec {
            role: "control",
            kind: PivotKind::Fixed,
            x: 400.0,
            y: 250.0,
            parent: Some("root"),
        },
        joint("end", 450.0, 300.0, Some("control")),
    ];
    let shapes: [(ShapeKind, &[&str]); 1] = [(ShapeKind::Curve, &["root", "control", "end"])];
    assemble(ids, &specs, &shapes)
}

pub fn circle(ids: &mut IdAllocator) -> Figure {
    let specs = [
        joint("root", 400.0, 300.0, None),
        joint("radius", 450.0, 300.0, Some("root")),
    ];
    let shapes: [(ShapeKind, &[&str]); 1] = [(ShapeKind::Circle, &["root", "radius"])];
    assemble(ids, &specs, &shapes)
}
