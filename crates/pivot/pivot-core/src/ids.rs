//! Identifiers and a small allocator for fresh pivot/figure/frame ids.
//!
//! Ids are plain strings because they cross the persistence and JS
//! boundaries unchanged. Identity never changes once assigned.

use uuid::Uuid;

pub type PivotId = String;
pub type FigureId = String;
pub type FrameId = String;
pub type ProjectId = String;

/// Monotonic allocator for pivot, figure, frame and project ids.
/// A per-allocator seed keeps ids from two allocators disjoint.
#[derive(Clone, Debug)]
pub struct IdAllocator {
    seed: String,
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    /// Allocator with a random seed.
    pub fn new() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self::with_seed(&uuid[..12])
    }

    /// Deterministic allocator (fixtures, tests).
    pub fn with_seed(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            next: 0,
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    #[inline]
    fn bump(&mut self) -> u32 {
        let n = self.next;
        self.next = self.next.wrapping_add(1);
        n
    }

    #[inline]
    pub fn pivot(&mut self) -> PivotId {
        let n = self.bump();
        format!("p-{}-{n}", self.seed)
    }

    /// Reserve a number shared by a batch of [`named_pivot`](Self::named_pivot)
    /// ids, e.g. all pivots of one template instance.
    #[inline]
    pub fn group(&mut self) -> u32 {
        self.bump()
    }

    /// Pivot id carrying a readable role suffix, e.g. `p-<seed>-<group>-shoulder`.
    #[inline]
    pub fn named_pivot(&self, group: u32, role: &str) -> PivotId {
        format!("p-{}-{group}-{role}", self.seed)
    }

    #[inline]
    pub fn figure(&mut self) -> FigureId {
        let n = self.bump();
        format!("fig-{}-{n}", self.seed)
    }

    #[inline]
    pub fn frame(&mut self) -> FrameId {
        let n = self.bump();
        format!("frame-{}-{n}", self.seed)
    }

    #[inline]
    pub fn project(&mut self) -> ProjectId {
        let n = self.bump();
        format!("project-{}-{n}", self.seed)
    }
}
