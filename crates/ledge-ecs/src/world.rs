//! The [`World`] is the top-level container for the ECS. It owns the entity
//! allocator, the component registry, one sparse-set pool per registered
//! component type, and the deferred-deletion queue.
//!
//! Deletion is deferred: [`World::despawn`] only parks an entity, and
//! [`World::flush_deletions`] — run once per frame, before any system —
//! actually strips its components and releases the index. Systems can
//! therefore request deletions freely while iterating query results without
//! invalidating the iteration.

use tracing::debug;

use crate::component::{ComponentPool, ComponentRegistry, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::sparse::SparseSet;
use crate::EcsError;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// The top-level ECS container.
///
/// All component pools are owned exclusively by the world; systems borrow
/// component data by entity handle for the duration of a single operation.
/// Mutable handles must not be held across [`flush_deletions`](Self::flush_deletions),
/// which physically relocates dense-array slots.
#[derive(Debug, Default)]
pub struct World {
    /// Entity handle allocator and lifecycle state.
    pub(crate) allocator: EntityAllocator,
    /// Component type registry.
    pub(crate) registry: ComponentRegistry,
    /// One type-erased pool per registered component, indexed by
    /// `ComponentTypeId`.
    pub(crate) pools: Vec<Box<dyn ComponentPool>>,
    /// Entities parked for deletion at the next flush.
    pending_deletions: Vec<Entity>,
}

impl World {
    /// Create a new, empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the component registry.
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Register a component type under the given `name`.
    ///
    /// Must be called once per type before first use.
    ///
    /// # Panics
    ///
    /// Panics if the type or name is already registered — a duplicate
    /// registration is a startup wiring error, not a runtime condition.
    pub fn register_component<T: 'static>(&mut self, name: &str) -> ComponentTypeId {
        let id = self.registry.register::<T>(name);
        self.pools.push(Box::new(SparseSet::<T>::new()));
        debug_assert_eq!(id.0 as usize + 1, self.pools.len());
        id
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Allocate a new live entity, reusing the lowest free index.
    pub fn spawn(&mut self) -> Entity {
        self.allocator.allocate()
    }

    /// Park `entity` for deletion at the next [`flush_deletions`](Self::flush_deletions).
    ///
    /// No-op for dead, stale, or already-pending entities. The entity's
    /// components stay visible (and `is_alive` stays true) until the flush.
    pub fn despawn(&mut self, entity: Entity) {
        if self.allocator.mark_pending(entity) {
            self.pending_deletions.push(entity);
        } else {
            debug!(%entity, "despawn ignored: entity not alive");
        }
    }

    /// Process all deferred deletions.
    ///
    /// For every queued entity this asks *every* registered pool to discard
    /// the index (pool removal is idempotent, so pools that never held the
    /// component are unaffected), then releases the index for reuse. Runs
    /// once per frame, at the start of the update, never mid-iteration.
    pub fn flush_deletions(&mut self) {
        if self.pending_deletions.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_deletions);
        let count = pending.len();
        for entity in pending {
            if !self.allocator.is_pending(entity) {
                continue;
            }
            for pool in &mut self.pools {
                pool.discard(entity.index());
            }
            self.allocator.release(entity);
        }
        debug!(count, "flushed deferred deletions");
    }

    /// Whether `entity` is live (including entities pending deletion).
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_live(entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.allocator.live_count()
    }

    // -- typed pool access --------------------------------------------------

    /// The pool for `T`, panicking if `T` was never registered.
    ///
    /// An unregistered component type is a programming error and fails fast
    /// at startup, unlike a per-entity miss which is an ordinary recoverable
    /// [`EcsError`].
    pub(crate) fn pool<T: 'static>(&self) -> &SparseSet<T> {
        let id = self.lookup_or_panic::<T>();
        self.pools[id.0 as usize]
            .as_any()
            .downcast_ref::<SparseSet<T>>()
            .expect("pool table out of sync with registry")
    }

    pub(crate) fn pool_mut<T: 'static>(&mut self) -> &mut SparseSet<T> {
        let id = self.lookup_or_panic::<T>();
        self.pools[id.0 as usize]
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("pool table out of sync with registry")
    }

    pub(crate) fn lookup_or_panic<T: 'static>(&self) -> ComponentTypeId {
        self.registry.lookup::<T>().unwrap_or_else(|| {
            panic!(
                "component type '{}' not registered. Registered components: [{}]",
                std::any::type_name::<T>(),
                self.registry.registered_names().join(", ")
            )
        })
    }

    // -- component operations -----------------------------------------------

    /// Whether `entity` currently has a `T` component.
    pub fn has<T: 'static>(&self, entity: Entity) -> bool {
        let pool = self.pool::<T>();
        self.allocator.is_live(entity) && pool.contains(entity.index())
    }

    /// Attach a default-initialized `T` to `entity`, returning a mutable
    /// handle to it.
    ///
    /// Idempotent: if the component already exists, the existing value is
    /// returned untouched.
    pub fn add<T: Default + 'static>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.lookup_or_panic::<T>();
        if !self.allocator.is_live(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        Ok(self.pool_mut::<T>().insert(entity.index(), T::default()))
    }

    /// Shared handle to `entity`'s `T` component.
    ///
    /// A dead entity or a missing component is a typed, recoverable error —
    /// query-then-filter gameplay logic hits this path routinely.
    pub fn get<T: 'static>(&self, entity: Entity) -> Result<&T, EcsError> {
        let pool = self.pool::<T>();
        if !self.allocator.is_live(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        pool.get(entity.index()).ok_or(EcsError::ComponentMissing {
            entity,
            component: std::any::type_name::<T>(),
        })
    }

    /// Mutable handle to `entity`'s `T` component.
    pub fn get_mut<T: 'static>(&mut self, entity: Entity) -> Result<&mut T, EcsError> {
        self.lookup_or_panic::<T>();
        if !self.allocator.is_live(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        self.pool_mut::<T>()
            .get_mut(entity.index())
            .ok_or(EcsError::ComponentMissing {
                entity,
                component: std::any::type_name::<T>(),
            })
    }

    /// Detach `entity`'s `T` component. No-op if absent or if the handle is
    /// stale (a stale handle must not touch the index's new owner).
    pub fn remove<T: 'static>(&mut self, entity: Entity) {
        self.lookup_or_panic::<T>();
        if !self.allocator.is_live(entity) {
            return;
        }
        self.pool_mut::<T>().remove(entity.index());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Health(u32);

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Mana(u32);

    fn setup_world() -> World {
        let mut world = World::new();
        world.register_component::<Health>("health");
        world.register_component::<Mana>("mana");
        world
    }

    #[test]
    fn add_get_roundtrip() {
        let mut world = setup_world();
        let e = world.spawn();
        *world.add::<Health>(e).unwrap() = Health(30);
        assert_eq!(world.get::<Health>(e), Ok(&Health(30)));
        assert!(world.has::<Health>(e));
        assert!(!world.has::<Mana>(e));
    }

    #[test]
    fn add_is_idempotent() {
        let mut world = setup_world();
        let e = world.spawn();
        *world.add::<Health>(e).unwrap() = Health(30);
        // Second add returns the existing slot, it does not reset the value.
        let again = world.add::<Health>(e).unwrap();
        assert_eq!(*again, Health(30));
    }

    #[test]
    fn get_missing_component_is_recoverable() {
        let mut world = setup_world();
        let e = world.spawn();
        let err = world.get::<Health>(e).unwrap_err();
        assert!(matches!(err, EcsError::ComponentMissing { .. }));
    }

    #[test]
    fn get_on_dead_entity_is_stale_error() {
        let mut world = setup_world();
        let e = world.spawn();
        world.despawn(e);
        world.flush_deletions();
        assert_eq!(
            world.get::<Health>(e),
            Err(EcsError::StaleEntity { entity: e })
        );
    }

    #[test]
    #[should_panic(expected = "not registered")]
    fn unregistered_type_access_panics() {
        struct Unregistered;
        let world = setup_world();
        let _ = world.has::<Unregistered>(Entity::new(0, 0));
    }

    #[test]
    fn despawn_is_deferred_until_flush() {
        let mut world = setup_world();
        let e = world.spawn();
        *world.add::<Health>(e).unwrap() = Health(5);

        world.despawn(e);
        // Still visible until the flush.
        assert!(world.is_alive(e));
        assert!(world.has::<Health>(e));

        world.flush_deletions();
        assert!(!world.is_alive(e));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn flush_strips_every_pool_and_recycles_index() {
        let mut world = setup_world();
        let e = world.spawn();
        *world.add::<Health>(e).unwrap() = Health(1);
        *world.add::<Mana>(e).unwrap() = Mana(2);

        world.despawn(e);
        world.flush_deletions();

        let reused = world.spawn();
        assert_eq!(reused.index(), e.index());
        assert_ne!(reused.generation(), e.generation());
        // The recycled index starts with no components.
        assert!(!world.has::<Health>(reused));
        assert!(!world.has::<Mana>(reused));
    }

    #[test]
    fn double_despawn_is_noop() {
        let mut world = setup_world();
        let e = world.spawn();
        world.despawn(e);
        world.despawn(e);
        world.flush_deletions();
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn stale_remove_does_not_touch_new_owner() {
        let mut world = setup_world();
        let old = world.spawn();
        world.despawn(old);
        world.flush_deletions();

        let new = world.spawn();
        assert_eq!(new.index(), old.index());
        *world.add::<Health>(new).unwrap() = Health(77);

        // Removing through the stale handle must not strip the new entity.
        world.remove::<Health>(old);
        assert_eq!(world.get::<Health>(new), Ok(&Health(77)));
    }
}
