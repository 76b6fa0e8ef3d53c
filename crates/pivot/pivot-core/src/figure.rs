//! Figure: flat pivot arena plus a parent-index vector.
//!
//! Pivots are stored once, in insertion order. Topology is expressed by
//! `parents[i]` (index of the parent, `None` for a root) and lookups by id go
//! through a hash index. Tree walks return borrowed pivots; mutation happens
//! on owned copies (copy-on-write), so two figures never share storage.

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::data::{Pivot, Shape, Vec2};
use crate::error::PivotError;
use crate::ids::{FigureId, PivotId};
use crate::nested::NestedFigure;
use crate::sampling::Pose;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NestedFigure", into = "NestedFigure")]
pub struct Figure {
    pub id: FigureId,
    pivots: Vec<Pivot>,
    parents: Vec<Option<usize>>,
    index: HashMap<PivotId, usize>,
    pub shapes: Vec<Shape>,
    /// Default stroke color for shapes without their own.
    pub color: Option<String>,
    pub opacity: Option<f64>,
    pub thickness: Option<f64>,
}

impl Figure {
    /// Empty figure without pivots or shapes.
    pub fn new(id: impl Into<FigureId>) -> Self {
        Self {
            id: id.into(),
            pivots: Vec::new(),
            parents: Vec::new(),
            index: HashMap::new(),
            shapes: Vec::new(),
            color: None,
            opacity: None,
            thickness: None,
        }
    }

    /// Build a figure from `(pivot, parent id)` entries. Parents may be listed
    /// after their children. Fails on duplicate ids, unknown parents and cycles.
    pub fn from_parts(
        id: impl Into<FigureId>,
        entries: Vec<(Pivot, Option<PivotId>)>,
        shapes: Vec<Shape>,
    ) -> Result<Self, PivotError> {
        let mut fig = Figure::new(id);
        let mut pending: Vec<Option<PivotId>> = Vec::with_capacity(entries.len());
        for (pivot, parent) in entries {
            fig.push_pivot(pivot, None)?;
            pending.push(parent);
        }
        for (idx, parent) in pending.into_iter().enumerate() {
            if let Some(pid) = parent {
                let pidx = fig
                    .index_of(&pid)
                    .ok_or_else(|| PivotError::UnknownPivot(pid.clone()))?;
                fig.parents[idx] = Some(pidx);
            }
        }
        for idx in 0..fig.pivots.len() {
            if fig.has_cycle_from(idx) {
                return Err(PivotError::WouldCycle {
                    parent: fig.parents[idx]
                        .map(|p| fig.pivots[p].id.clone())
                        .unwrap_or_default(),
                    child: fig.pivots[idx].id.clone(),
                });
            }
        }
        fig.shapes = shapes;
        Ok(fig)
    }

    pub(crate) fn push_pivot(
        &mut self,
        pivot: Pivot,
        parent: Option<usize>,
    ) -> Result<usize, PivotError> {
        if self.index.contains_key(&pivot.id) {
            return Err(PivotError::DuplicatePivot(pivot.id));
        }
        let idx = self.pivots.len();
        self.index.insert(pivot.id.clone(), idx);
        self.pivots.push(pivot);
        self.parents.push(parent);
        Ok(idx)
    }

    fn has_cycle_from(&self, start: usize) -> bool {
        let mut cur = self.parents[start];
        let mut steps = 0;
        while let Some(p) = cur {
            if p == start || steps > self.pivots.len() {
                return true;
            }
            steps += 1;
            cur = self.parents[p];
        }
        false
    }

    // --- Arena access -------------------------------------------------------

    #[inline]
    pub fn len(&self) -> usize {
        self.pivots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pivots.is_empty()
    }

    /// Pivots in arena (insertion) order.
    #[inline]
    pub fn pivots(&self) -> &[Pivot] {
        &self.pivots
    }

    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[inline]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    #[inline]
    pub fn pivot(&self, id: &str) -> Option<&Pivot> {
        self.index_of(id).map(|i| &self.pivots[i])
    }

    #[inline]
    pub(crate) fn pivot_at(&self, idx: usize) -> &Pivot {
        &self.pivots[idx]
    }

    #[inline]
    pub(crate) fn pivot_at_mut(&mut self, idx: usize) -> &mut Pivot {
        &mut self.pivots[idx]
    }

    #[inline]
    pub(crate) fn parent_index(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    #[inline]
    pub(crate) fn set_parent_index(&mut self, idx: usize, parent: Option<usize>) {
        self.parents[idx] = parent;
    }

    /// Remove the pivot at `idx`, shifting later indices down. Callers fix up
    /// any parent links that pointed at `idx` beforehand.
    pub(crate) fn remove_at(&mut self, idx: usize) -> Pivot {
        let removed = self.pivots.remove(idx);
        self.parents.remove(idx);
        for p in self.parents.iter_mut() {
            if let Some(pi) = *p {
                if pi > idx {
                    *p = Some(pi - 1);
                }
            }
        }
        self.rebuild_index();
        removed
    }

    /// Reorder the arena so that old index `order[k]` lands at `k`. `order`
    /// must be a permutation of `0..len`.
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.pivots.len());
        let mut new_of_old = vec![0usize; order.len()];
        for (new, &old) in order.iter().enumerate() {
            new_of_old[old] = new;
        }
        let pivots = order.iter().map(|&o| self.pivots[o].clone()).collect();
        let parents = order
            .iter()
            .map(|&o| self.parents[o].map(|p| new_of_old[p]))
            .collect();
        self.pivots = pivots;
        self.parents = parents;
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        for (i, p) in self.pivots.iter().enumerate() {
            self.index.insert(p.id.clone(), i);
        }
    }

    // --- Tree walks ---------------------------------------------------------

    /// The tree root: the first parentless pivot.
    pub fn root(&self) -> Option<&Pivot> {
        self.root_index().map(|i| &self.pivots[i])
    }

    pub(crate) fn root_index(&self) -> Option<usize> {
        self.parents.iter().position(|p| p.is_none())
    }

    /// Every parentless pivot. More than one means the tree is transiently
    /// disconnected (builder edits).
    pub fn roots(&self) -> Vec<&Pivot> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_none())
            .map(|(i, _)| &self.pivots[i])
            .collect()
    }

    pub fn parent(&self, id: &str) -> Option<&Pivot> {
        let idx = self.index_of(id)?;
        self.parents[idx].map(|p| &self.pivots[p])
    }

    pub(crate) fn child_indices(&self, idx: usize) -> Vec<usize> {
        self.parents
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == Some(idx))
            .map(|(i, _)| i)
            .collect()
    }

    /// Direct children in arena order. Unknown id yields nothing.
    pub fn children(&self, id: &str) -> Vec<&Pivot> {
        match self.index_of(id) {
            Some(idx) => self
                .child_indices(idx)
                .into_iter()
                .map(|i| &self.pivots[i])
                .collect(),
            None => Vec::new(),
        }
    }

    pub(crate) fn ancestor_indices(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cur = self.parents[idx];
        while let Some(p) = cur {
            // Bounded so a corrupted parent map cannot spin forever.
            if out.len() >= self.pivots.len() {
                break;
            }
            out.push(p);
            cur = self.parents[p];
        }
        out
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: &str) -> Vec<&Pivot> {
        match self.index_of(id) {
            Some(idx) => self
                .ancestor_indices(idx)
                .into_iter()
                .map(|i| &self.pivots[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// `idx` followed by all of its descendants (breadth first).
    pub(crate) fn subtree_indices(&self, idx: usize) -> Vec<usize> {
        let mut kids: Vec<Vec<usize>> = vec![Vec::new(); self.pivots.len()];
        for (i, p) in self.parents.iter().enumerate() {
            if let Some(pi) = *p {
                kids[pi].push(i);
            }
        }
        let mut seen = vec![false; self.pivots.len()];
        let mut out = vec![idx];
        seen[idx] = true;
        let mut cursor = 0;
        while cursor < out.len() {
            let cur = out[cursor];
            cursor += 1;
            for &k in &kids[cur] {
                if !seen[k] {
                    seen[k] = true;
                    out.push(k);
                }
            }
        }
        out
    }

    /// All descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: &str) -> Vec<&Pivot> {
        match self.index_of(id) {
            Some(idx) => self.subtree_indices(idx)[1..]
                .iter()
                .map(|&i| &self.pivots[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// True when `ancestor` lies on the parent chain of `id`.
    pub fn is_ancestor(&self, ancestor: &str, id: &str) -> bool {
        match (self.index_of(ancestor), self.index_of(id)) {
            (Some(a), Some(i)) => self.ancestor_indices(i).contains(&a),
            _ => false,
        }
    }

    /// True when every id exists and the ids form one connected piece of the
    /// tree using only parent/child links between members.
    pub fn is_connected_component(&self, ids: &[&str]) -> bool {
        let mut members: HashSet<usize> = HashSet::with_capacity(ids.len());
        for id in ids {
            match self.index_of(id) {
                Some(i) => {
                    members.insert(i);
                }
                None => return false,
            }
        }
        let Some(&start) = members.iter().next() else {
            return true;
        };
        let mut seen: HashSet<usize> = HashSet::with_capacity(members.len());
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(cur) = stack.pop() {
            let mut neighbours = self.child_indices(cur);
            if let Some(p) = self.parents[cur] {
                neighbours.push(p);
            }
            for n in neighbours {
                if members.contains(&n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len() == members.len()
    }

    // --- Copy-on-write positions ------------------------------------------

    /// New figure with the same topology and `pose` positions applied. Pivots
    /// missing from `pose` keep their current position.
    pub fn with_pose(&self, pose: &Pose) -> Figure {
        let mut out = self.clone();
        for p in out.pivots.iter_mut() {
            if let Some(pos) = pose.get(&p.id) {
                p.pos = *pos;
            }
        }
        out
    }

    /// Current positions keyed by pivot id.
    pub fn pose(&self) -> Pose {
        self.pivots.iter().map(|p| (p.id.clone(), p.pos)).collect()
    }

    #[inline]
    pub(crate) fn pos(&self, idx: usize) -> Vec2 {
        self.pivots[idx].pos
    }

    #[inline]
    pub(crate) fn set_pos(&mut self, idx: usize, pos: Vec2) {
        self.pivots[idx].pos = pos;
    }

    /// Parent id lookup used by the persistence layer.
    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.parent(id).map(|p| p.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PivotKind;

    fn chain() -> Figure {
        // root -> a -> b, root -> c
        Figure::from_parts(
            "f",
            vec![
                (Pivot::joint("b", 2.0, 0.0), Some("a".into())),
                (Pivot::joint("root", 0.0, 0.0), None),
                (Pivot::fixed("a", 1.0, 0.0), Some("root".into())),
                (Pivot::joint("c", 0.0, 1.0), Some("root".into())),
            ],
            vec![],
        )
        .expect("valid tree")
    }

    #[test]
    fn walks() {
        let f = chain();
        assert_eq!(f.root().map(|p| p.id.as_str()), Some("root"));
        assert_eq!(f.parent_id("b"), Some("a"));
        let anc: Vec<_> = f.ancestors("b").iter().map(|p| p.id.clone()).collect();
        assert_eq!(anc, vec!["a", "root"]);
        let kids: Vec<_> = f.children("root").iter().map(|p| p.id.clone()).collect();
        assert_eq!(kids, vec!["a", "c"]);
        let desc: Vec<_> = f.descendants("root").iter().map(|p| p.id.clone()).collect();
        assert_eq!(desc.len(), 3);
        assert!(f.is_ancestor("root", "b"));
        assert!(!f.is_ancestor("c", "b"));
        assert_eq!(f.pivot("a").map(|p| p.kind), Some(PivotKind::Fixed));
    }

    #[test]
    fn unknown_ids_are_empty() {
        let f = chain();
        assert!(f.children("zzz").is_empty());
        assert!(f.ancestors("zzz").is_empty());
        assert!(f.parent("root").is_none());
    }

    #[test]
    fn connected_components() {
        let f = chain();
        assert!(f.is_connected_component(&["root", "a", "b"]));
        assert!(f.is_connected_component(&["a", "root", "c"]));
        assert!(!f.is_connected_component(&["b", "c"]));
        assert!(!f.is_connected_component(&["b", "missing"]));
        assert!(f.is_connected_component(&[]));
    }

    #[test]
    fn from_parts_rejects_bad_input() {
        let dup = Figure::from_parts(
            "f",
            vec![(Pivot::joint("a", 0.0, 0.0), None), (Pivot::joint("a", 1.0, 0.0), None)],
            vec![],
        );
        assert_eq!(dup.unwrap_err(), PivotError::DuplicatePivot("a".into()));

        let cyc = Figure::from_parts(
            "f",
            vec![
                (Pivot::joint("a", 0.0, 0.0), Some("b".into())),
                (Pivot::joint("b", 1.0, 0.0), Some("a".into())),
            ],
            vec![],
        );
        assert!(matches!(cyc, Err(PivotError::WouldCycle { .. })));
    }

    #[test]
    fn with_pose_copies_storage() {
        let f = chain();
        let mut pose = f.pose();
        pose.insert("b".into(), Vec2::new(9.0, 9.0));
        let g = f.with_pose(&pose);
        assert_eq!(g.pivot("b").unwrap().pos, Vec2::new(9.0, 9.0));
        assert_eq!(f.pivot("b").unwrap().pos, Vec2::new(2.0, 0.0));
        assert!(!std::ptr::eq(f.pivots().as_ptr(), g.pivots().as_ptr()));
    }
}
