//! Entity identifiers and lifecycle allocation.
//!
//! An [`Entity`] is a 64-bit handle that packs a *generation* counter in the
//! high 32 bits and an *index* in the low 32 bits. Indices are recycled
//! lowest-first so component pools stay dense; the generation is bumped every
//! time an index is released, which lets stale handles be detected instead of
//! silently aliasing a reused index.
//!
//! Deletion is a two-step state machine: [`EntityAllocator::mark_pending`]
//! parks an entity in **PendingDeletion** (it still counts as live, and its
//! components remain visible) until the world's deletion flush calls
//! [`EntityAllocator::release`] at the next frame boundary.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A generational entity handle.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(u64);

impl Entity {
    /// Construct an `Entity` from an index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// The index portion (low 32 bits). This is the key into component pools.
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// The generation portion (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Per-index lifecycle state.
///
/// `Free -> Alive` on allocate, `Alive -> PendingDeletion` on a deferred
/// delete, `PendingDeletion -> Free` on the flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Free,
    Alive,
    PendingDeletion,
}

/// Allocates and recycles [`Entity`] handles with generational tracking.
///
/// Free indices are kept in a min-heap so allocation always reuses the
/// lowest-numbered free index. Reusing low indices keeps the sparse pages of
/// every component pool compact instead of growing without bound.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    /// Current generation for each index slot.
    generations: Vec<u32>,
    /// Lifecycle state for each index slot.
    states: Vec<SlotState>,
    /// Recyclable indices, lowest first.
    free_indices: BinaryHeap<Reverse<u32>>,
}

impl EntityAllocator {
    /// Create a new, empty allocator.
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            states: Vec::new(),
            free_indices: BinaryHeap::new(),
        }
    }

    /// Allocate a fresh [`Entity`].
    ///
    /// Reuses the lowest free index if one exists (with the generation that
    /// was bumped when it was released); otherwise appends a new index.
    pub fn allocate(&mut self) -> Entity {
        if let Some(Reverse(index)) = self.free_indices.pop() {
            self.states[index as usize] = SlotState::Alive;
            Entity::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.states.push(SlotState::Alive);
            Entity::new(index, 0)
        }
    }

    /// Park a live entity in the PendingDeletion state.
    ///
    /// Only valid from Alive: returns `false` for stale handles, free slots,
    /// and entities already pending deletion (a double delete is a no-op).
    pub fn mark_pending(&mut self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        if idx >= self.states.len()
            || self.generations[idx] != entity.generation()
            || self.states[idx] != SlotState::Alive
        {
            return false;
        }
        self.states[idx] = SlotState::PendingDeletion;
        true
    }

    /// Release a pending entity's index for reuse, bumping its generation so
    /// outstanding handles go stale.
    ///
    /// Returns `false` unless the entity is currently PendingDeletion with a
    /// matching generation.
    pub fn release(&mut self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        if idx >= self.states.len()
            || self.generations[idx] != entity.generation()
            || self.states[idx] != SlotState::PendingDeletion
        {
            return false;
        }
        self.states[idx] = SlotState::Free;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push(Reverse(entity.index()));
        true
    }

    /// Whether `entity` refers to a current (Alive or PendingDeletion) slot.
    ///
    /// Pending entities still count as live: their components stay visible
    /// until the deletion flush actually runs.
    pub fn is_live(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.states.len()
            && self.generations[idx] == entity.generation()
            && self.states[idx] != SlotState::Free
    }

    /// The current handle for a live slot, or `None` if the slot is free.
    ///
    /// Used by queries to turn the raw indices stored in component pools
    /// back into full generational handles.
    pub fn live_entity_at(&self, index: u32) -> Option<Entity> {
        let idx = index as usize;
        if idx < self.states.len() && self.states[idx] != SlotState::Free {
            Some(Entity::new(index, self.generations[idx]))
        } else {
            None
        }
    }

    /// Whether `entity` is parked for deletion at the next flush.
    pub fn is_pending(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.states.len()
            && self.generations[idx] == entity.generation()
            && self.states[idx] == SlotState::PendingDeletion
    }

    /// Number of live (Alive + PendingDeletion) entities.
    pub fn live_count(&self) -> usize {
        self.states
            .iter()
            .filter(|&&s| s != SlotState::Free)
            .count()
    }

    /// Total number of index slots ever created (live or free).
    pub fn slot_count(&self) -> usize {
        self.states.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk an entity through the full Free -> Alive -> Pending -> Free cycle.
    fn delete(alloc: &mut EntityAllocator, e: Entity) {
        assert!(alloc.mark_pending(e));
        assert!(alloc.release(e));
    }

    #[test]
    fn allocate_unique_indices() {
        let mut alloc = EntityAllocator::new();
        let ids: Vec<Entity> = (0..100).map(|_| alloc.allocate()).collect();
        let mut indices: Vec<u32> = ids.iter().map(|e| e.index()).collect();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), 100);
    }

    #[test]
    fn lowest_free_index_reused_first() {
        let mut alloc = EntityAllocator::new();
        let entities: Vec<Entity> = (0..5).map(|_| alloc.allocate()).collect();

        // Free index 3, then index 1. The next allocation must take 1.
        delete(&mut alloc, entities[3]);
        delete(&mut alloc, entities[1]);

        assert_eq!(alloc.allocate().index(), 1);
        assert_eq!(alloc.allocate().index(), 3);
        // Both recycled; a further allocation appends a new index.
        assert_eq!(alloc.allocate().index(), 5);
    }

    #[test]
    fn generation_bumps_on_release() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert_eq!(e0.generation(), 0);
        delete(&mut alloc, e0);

        let e1 = alloc.allocate();
        assert_eq!(e1.index(), e0.index());
        assert_eq!(e1.generation(), 1);
    }

    #[test]
    fn stale_handle_detection() {
        let mut alloc = EntityAllocator::new();
        let e0 = alloc.allocate();
        assert!(alloc.is_live(e0));
        delete(&mut alloc, e0);
        assert!(!alloc.is_live(e0));

        let _e1 = alloc.allocate(); // recycles the index
        assert!(!alloc.is_live(e0), "stale handle must stay dead after reuse");
    }

    #[test]
    fn pending_entities_still_live() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.mark_pending(e));
        assert!(alloc.is_live(e));
        assert!(alloc.is_pending(e));
        assert_eq!(alloc.live_count(), 1);
    }

    #[test]
    fn double_mark_pending_is_noop() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        assert!(alloc.mark_pending(e));
        assert!(!alloc.mark_pending(e));
    }

    #[test]
    fn release_requires_pending() {
        let mut alloc = EntityAllocator::new();
        let e = alloc.allocate();
        // Alive but not pending: release refuses.
        assert!(!alloc.release(e));
        assert!(alloc.mark_pending(e));
        assert!(alloc.release(e));
        assert!(!alloc.release(e));
    }

    #[test]
    fn entity_packing_roundtrip() {
        let e = Entity::new(42, 7);
        assert_eq!(e.index(), 42);
        assert_eq!(e.generation(), 7);
        assert_eq!(format!("{e}"), "42v7");
    }
}
