//! Persistence format: the editor's nested pivot tree.
//!
//! `.psfigure` / `.psproject` files and the browser store keep each figure as
//! a `root_pivot` owning its `children` recursively. The core works on the
//! flat arena in figure.rs; [`Figure`] (de)serializes through this module.
//!
//! Notes:
//! - Pivot `type` is `"joint"` or `"fixed"`; optional `customColor`, `hidden`.
//! - Parentless subtrees other than the root (transient builder state) are
//!   kept in `detached` so they survive a save/load cycle.
//! - Duplicate pivot ids fail the load.

use serde::{Deserialize, Serialize};

use crate::data::{Pivot, PivotKind, Project, Shape, Vec2};
use crate::error::PivotError;
use crate::figure::Figure;
use crate::ids::{FigureId, PivotId};

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NestedPivot {
    pub id: PivotId,
    #[serde(rename = "type", default)]
    pub kind: PivotKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub children: Vec<NestedPivot>,
    #[serde(rename = "customColor", default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hidden: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NestedFigure {
    pub id: FigureId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_pivot: Option<NestedPivot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub detached: Vec<NestedPivot>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl TryFrom<NestedFigure> for Figure {
    type Error = PivotError;

    fn try_from(nf: NestedFigure) -> Result<Self, Self::Error> {
        let mut fig = Figure::new(nf.id);
        let tops = nf.root_pivot.into_iter().chain(nf.detached);
        for top in tops {
            // Pre-order, children in declared order.
            let mut stack: Vec<(NestedPivot, Option<usize>)> = vec![(top, None)];
            while let Some((np, parent)) = stack.pop() {
                let NestedPivot {
                    id,
                    kind,
                    x,
                    y,
                    children,
                    custom_color,
                    hidden,
                } = np;
                let pivot = Pivot {
                    id,
                    kind,
                    pos: Vec2::new(x, y),
                    hidden,
                    color: custom_color,
                };
                let idx = fig.push_pivot(pivot, parent)?;
                for child in children.into_iter().rev() {
                    stack.push((child, Some(idx)));
                }
            }
        }
        fig.shapes = nf.shapes;
        fig.color = nf.color;
        fig.opacity = nf.opacity;
        fig.thickness = nf.thickness;
        Ok(fig)
    }
}

/// Build nested trees for `tops` without recursion: pivots are visited
/// parent-first, then assembled in reverse so every child is finished before
/// its parent takes it.
fn nest_all(fig: &Figure, kids: &[Vec<usize>], tops: &[usize]) -> Vec<NestedPivot> {
    let mut order = Vec::with_capacity(fig.len());
    let mut stack: Vec<usize> = tops.iter().rev().copied().collect();
    while let Some(idx) = stack.pop() {
        order.push(idx);
        stack.extend(kids[idx].iter().rev());
    }

    let mut built: Vec<Option<NestedPivot>> = vec![None; fig.len()];
    for &idx in order.iter().rev() {
        let p = fig.pivot_at(idx);
        let children = kids[idx].iter().filter_map(|&k| built[k].take()).collect();
        built[idx] = Some(NestedPivot {
            id: p.id.clone(),
            kind: p.kind,
            x: p.pos.x,
            y: p.pos.y,
            children,
            custom_color: p.color.clone(),
            hidden: p.hidden,
        });
    }
    tops.iter().filter_map(|&t| built[t].take()).collect()
}

impl From<Figure> for NestedFigure {
    fn from(fig: Figure) -> Self {
        let mut kids: Vec<Vec<usize>> = vec![Vec::new(); fig.len()];
        let mut tops: Vec<usize> = Vec::new();
        for i in 0..fig.len() {
            match fig.parent_index(i) {
                Some(p) => kids[p].push(i),
                None => tops.push(i),
            }
        }
        let mut nested = nest_all(&fig, &kids, &tops).into_iter();
        let root_pivot = nested.next();
        let detached = nested.collect();
        NestedFigure {
            root_pivot,
            detached,
            id: fig.id,
            shapes: fig.shapes,
            color: fig.color,
            opacity: fig.opacity,
            thickness: fig.thickness,
        }
    }
}

/// Parse a `.psfigure` JSON document.
pub fn parse_figure_json(s: &str) -> Result<Figure, PivotError> {
    Ok(serde_json::from_str(s)?)
}

/// Parse a `.psproject` JSON document.
pub fn parse_project_json(s: &str) -> Result<Project, PivotError> {
    Ok(serde_json::from_str(s)?)
}

pub fn figure_to_json(fig: &Figure) -> Result<String, PivotError> {
    Ok(serde_json::to_string_pretty(fig)?)
}

pub fn project_to_json(project: &Project) -> Result<String, PivotError> {
    Ok(serde_json::to_string_pretty(project)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE: &str = r##"{
        "id": "fig-1",
        "root_pivot": {
            "id": "root", "type": "joint", "x": 400, "y": 300,
            "children": [
                { "id": "ctl", "type": "fixed", "x": 400, "y": 250,
                  "children": [ { "id": "end", "type": "joint", "x": 450, "y": 300, "children": [] } ] }
            ]
        },
        "shapes": [ { "type": "curve", "pivotIds": ["root", "ctl", "end"] } ],
        "color": "#000000"
    }"##;

    #[test]
    fn parse_nested_figure() {
        let fig = parse_figure_json(SIMPLE).expect("figure parses");
        assert_eq!(fig.len(), 3);
        assert_eq!(fig.root().unwrap().id, "root");
        assert_eq!(fig.parent_id("end"), Some("ctl"));
        assert_eq!(fig.pivot("ctl").unwrap().kind, PivotKind::Fixed);
        assert_eq!(fig.color.as_deref(), Some("#000000"));
    }

    #[test]
    fn roundtrip_keeps_detached_subtrees() {
        let mut fig = parse_figure_json(SIMPLE).unwrap();
        let idx = fig.index_of("end").unwrap();
        fig.set_parent_index(idx, None);
        let json = figure_to_json(&fig).unwrap();
        assert!(json.contains("\"detached\""));
        let back = parse_figure_json(&json).unwrap();
        assert_eq!(back.roots().len(), 2);
        assert!(back.parent("end").is_none());
    }

    #[test]
    fn duplicate_ids_fail() {
        let bad = r#"{ "id": "f", "root_pivot": { "id": "a", "type": "joint", "x": 0, "y": 0,
            "children": [ { "id": "a", "type": "joint", "x": 1, "y": 1, "children": [] } ] } }"#;
        let err = parse_figure_json(bad).unwrap_err();
        assert!(err.to_string().contains("duplicate pivot id"));
    }

    #[test]
    fn missing_shapes_default_to_empty() {
        let fig = parse_figure_json(
            r#"{ "id": "f", "root_pivot": { "id": "a", "type": "fixed", "x": 0, "y": 0, "children": [] } }"#,
        )
        .unwrap();
        assert!(fig.shapes.is_empty());
    }

    #[test]
    fn long_chain_round_trips_in_order() {
        let entries = (0..2_000)
            .map(|i| {
                let parent = (i > 0).then(|| format!("p{}", i - 1));
                (Pivot::joint(format!("p{i}"), i as f64, 0.0), parent)
            })
            .collect();
        let fig = Figure::from_parts("chain", entries, vec![]).unwrap();
        let nested = NestedFigure::from(fig.clone());

        let mut depth = 0;
        let mut cur = nested.root_pivot.as_ref();
        while let Some(np) = cur {
            assert_eq!(np.id, format!("p{depth}"));
            depth += 1;
            cur = np.children.first();
        }
        assert_eq!(depth, 2_000);
        assert_eq!(Figure::try_from(nested).unwrap(), fig);
    }

    #[test]
    fn sibling_order_is_kept() {
        let mut fig = parse_figure_json(SIMPLE).unwrap();
        fig.insert_pivot(Pivot::fixed("ctl2", 1.0, 1.0), Some("root")).unwrap();
        let nested = NestedFigure::from(fig);
        let root = nested.root_pivot.unwrap();
        let ids: Vec<_> = root.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["ctl", "ctl2"]);
        assert_eq!(root.children[0].children[0].id, "end");
    }
}
