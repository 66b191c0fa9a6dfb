//! Ledge ECS -- sparse-set Entity Component System with deferred deletion.
//!
//! This crate provides the storage core for the Ledge runtime. Each component
//! type lives in its own paged sparse set (dense values, O(1) insert/remove,
//! cache-friendly iteration), entities are generational handles whose indices
//! are recycled lowest-first, and deletions are deferred to an explicit
//! frame-boundary flush so systems can request them mid-iteration.
//!
//! # Quick Start
//!
//! ```
//! use ledge_ecs::prelude::*;
//!
//! #[derive(Debug, Default, Clone, Copy, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! world.register_component::<Position>("position");
//!
//! let e = world.spawn();
//! *world.add::<Position>(e)? = Position { x: 4.0, y: 2.0 };
//!
//! assert_eq!(world.get::<Position>(e)?, &Position { x: 4.0, y: 2.0 });
//!
//! world.despawn(e);           // deferred
//! assert!(world.is_alive(e)); // still visible this frame
//! world.flush_deletions();    // frame boundary
//! assert!(!world.is_alive(e));
//! # Ok::<(), ledge_ecs::EcsError>(())
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod query;
pub mod sparse;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Recoverable errors produced by per-entity component operations.
///
/// These cover the *runtime miss* half of the error taxonomy: an entity that
/// is dead or simply lacks the component, which ordinary query-then-filter
/// gameplay logic runs into all the time. The *programming error* half
/// (accessing a component type that was never registered) panics instead —
/// that is a startup wiring mistake and fails fast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    /// The entity is dead: its index was released, or the handle's
    /// generation no longer matches (the index has been recycled).
    #[error("entity {entity} is not alive (stale handle or never allocated)")]
    StaleEntity {
        /// The offending handle.
        entity: entity::Entity,
    },

    /// The entity is alive but does not hold the requested component.
    #[error("entity {entity} has no '{component}' component")]
    ComponentMissing {
        /// The queried entity.
        entity: entity::Entity,
        /// Type name of the missing component.
        component: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{ComponentInfo, ComponentRegistry, ComponentTypeId};
    pub use crate::entity::Entity;
    pub use crate::sparse::SparseSet;
    pub use crate::world::World;
    pub use crate::EcsError;
}

// ---------------------------------------------------------------------------
// Integration tests
// ---------------------------------------------------------------------------
