//! Structural edits issued by the figure builder.
//!
//! These mutate a figure in place (the builder owns its working copy) and
//! return `PivotError` for bad references. They keep the arena consistent but
//! may leave the figure transiently invalid; run [`Figure::validate`] after.

use log::debug;

use crate::data::{Pivot, PivotKind, Shape, Vec2};
use crate::error::PivotError;
use crate::figure::Figure;
use crate::ids::{IdAllocator, PivotId};

impl Figure {
    fn require(&self, id: &str) -> Result<usize, PivotError> {
        self.index_of(id)
            .ok_or_else(|| PivotError::UnknownPivot(id.to_string()))
    }

    /// Add a fresh pivot under `parent` (or parentless when `None`).
    pub fn add_pivot(
        &mut self,
        parent: Option<&str>,
        pos: Vec2,
        kind: PivotKind,
        ids: &mut IdAllocator,
    ) -> Result<PivotId, PivotError> {
        let mut id = ids.pivot();
        while self.contains(&id) {
            id = ids.pivot();
        }
        self.insert_pivot(Pivot::new(id.clone(), kind, pos.x, pos.y), parent)?;
        Ok(id)
    }

    /// Insert a prepared pivot under `parent`.
    pub fn insert_pivot(&mut self, pivot: Pivot, parent: Option<&str>) -> Result<(), PivotError> {
        let parent = parent.map(|p| self.require(p)).transpose()?;
        self.push_pivot(pivot, parent)?;
        Ok(())
    }

    /// Remove a pivot. Shapes referencing it are dropped and its children are
    /// re-attached to its parent. The tree root can only go when it is alone.
    pub fn remove_pivot(&mut self, id: &str) -> Result<Pivot, PivotError> {
        let idx = self.require(id)?;
        if self.root_index() == Some(idx) && self.len() > 1 {
            return Err(PivotError::RootRemoval(id.to_string()));
        }
        let parent = self.parent_index(idx);
        for child in self.child_indices(idx) {
            self.set_parent_index(child, parent);
        }
        let before = self.shapes.len();
        self.shapes.retain(|s| !s.references(id));
        debug!(
            "removed pivot {id}; dropped {} shape(s)",
            before - self.shapes.len()
        );
        Ok(self.remove_at(idx))
    }

    pub fn move_pivot(&mut self, id: &str, pos: Vec2) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        self.pivot_at_mut(idx).pos = pos;
        Ok(())
    }

    pub fn set_pivot_kind(&mut self, id: &str, kind: PivotKind) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        self.pivot_at_mut(idx).kind = kind;
        Ok(())
    }

    pub fn set_pivot_hidden(&mut self, id: &str, hidden: bool) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        self.pivot_at_mut(idx).hidden = hidden;
        Ok(())
    }

    pub fn set_pivot_color(&mut self, id: &str, color: Option<String>) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        self.pivot_at_mut(idx).color = color;
        Ok(())
    }

    /// Move `id` (with its subtree) under `new_parent`.
    pub fn reparent(&mut self, id: &str, new_parent: &str) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        let pidx = self.require(new_parent)?;
        if idx == pidx || self.ancestor_indices(pidx).contains(&idx) {
            return Err(PivotError::WouldCycle {
                parent: new_parent.to_string(),
                child: id.to_string(),
            });
        }
        self.set_parent_index(idx, Some(pidx));
        Ok(())
    }

    /// Make `id` the root: the parent chain above it is reversed and the
    /// pivot moves to the front of the arena so [`Figure::root`] returns it.
    pub fn set_root(&mut self, id: &str) -> Result<(), PivotError> {
        let idx = self.require(id)?;
        let mut chain = vec![idx];
        chain.extend(self.ancestor_indices(idx));
        for pair in chain.windows(2) {
            self.set_parent_index(pair[1], Some(pair[0]));
        }
        self.set_parent_index(idx, None);

        let mut order = vec![idx];
        order.extend((0..self.len()).filter(|&i| i != idx));
        self.reorder(&order);
        Ok(())
    }

    /// Append a shape. All referenced pivots must exist and the pivot count
    /// must suit the shape kind. Returns the new shape's index.
    pub fn add_shape(&mut self, shape: Shape) -> Result<usize, PivotError> {
        if !shape.kind.arity_ok(shape.pivot_ids.len()) {
            return Err(PivotError::ShapeArity {
                kind: shape.kind,
                count: shape.pivot_ids.len(),
            });
        }
        for id in &shape.pivot_ids {
            self.require(id)?;
        }
        self.shapes.push(shape);
        Ok(self.shapes.len() - 1)
    }

    pub fn remove_shape(&mut self, index: usize) -> Result<Shape, PivotError> {
        if index >= self.shapes.len() {
            return Err(PivotError::UnknownShape {
                index,
                len: self.shapes.len(),
            });
        }
        Ok(self.shapes.remove(index))
    }

    /// Connect two pivots with a line. When `b` has no parent and is not
    /// above `a`, it is attached under `a` as well.
    pub fn connect_pivots(&mut self, a: &str, b: &str) -> Result<usize, PivotError> {
        let ai = self.require(a)?;
        let bi = self.require(b)?;
        if ai == bi {
            return Err(PivotError::WouldCycle {
                parent: a.to_string(),
                child: b.to_string(),
            });
        }
        let shape = self.add_shape(Shape::line(a, b))?;
        if self.parent_index(bi).is_none() && !self.ancestor_indices(ai).contains(&bi) {
            self.set_parent_index(bi, Some(ai));
        }
        Ok(shape)
    }
}
