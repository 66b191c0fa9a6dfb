//! Component type registration and type-erased pool handles.
//!
//! Every component type must be registered once, up front, in a
//! [`ComponentRegistry`]. Registration assigns a dense [`ComponentTypeId`]
//! that indexes the world's pool table directly. There is no reflection:
//! pools are stored behind the [`ComponentPool`] trait and recovered with a
//! single checked `Any` downcast.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::sparse::SparseSet;

// ---------------------------------------------------------------------------
// ComponentTypeId
// ---------------------------------------------------------------------------

/// Opaque, lightweight identifier for a registered component type.
///
/// Assigned densely starting at 0, so it doubles as the index into the
/// world's pool table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub(crate) u32);

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentInfo / ComponentRegistry
// ---------------------------------------------------------------------------

/// Metadata about a registered component type.
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    /// Unique ID assigned at registration time.
    pub id: ComponentTypeId,
    /// Human-readable name (supplied by the caller, used in diagnostics).
    pub name: String,
    /// Rust `TypeId` for runtime type checking.
    pub type_id: TypeId,
}

/// Registry mapping Rust types to [`ComponentTypeId`]s and their metadata.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentTypeId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            infos: Vec::new(),
        }
    }

    /// Register a component type under the given `name`.
    ///
    /// # Panics
    ///
    /// Panics if the type (or the name) is already registered. Registering a
    /// type twice is a wiring mistake, not a runtime condition, so it fails
    /// loudly at startup instead of being papered over.
    pub fn register<T: 'static>(&mut self, name: &str) -> ComponentTypeId {
        let rust_type_id = TypeId::of::<T>();
        assert!(
            !self.by_type.contains_key(&rust_type_id),
            "component type '{name}' is already registered"
        );
        assert!(
            !self.infos.iter().any(|info| info.name == name),
            "component name '{name}' is already registered for a different type"
        );

        let id = ComponentTypeId(self.infos.len() as u32);
        self.infos.push(ComponentInfo {
            id,
            name: name.to_owned(),
            type_id: rust_type_id,
        });
        self.by_type.insert(rust_type_id, id);
        id
    }

    /// Look up a component type by its Rust `TypeId`.
    pub fn lookup<T: 'static>(&self) -> Option<ComponentTypeId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    /// Get the [`ComponentInfo`] for a registered component type ID.
    pub fn info(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.infos.get(id.0 as usize)
    }

    /// Total number of registered component types.
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Whether any component types have been registered.
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// The names of all registered component types, sorted.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.infos.iter().map(|i| i.name.as_str()).collect();
        names.sort();
        names
    }
}

// ---------------------------------------------------------------------------
// ComponentPool -- type-erased pool handle
// ---------------------------------------------------------------------------

/// Type-erased interface over a [`SparseSet<T>`].
///
/// This is the only seam between the untyped pool table and typed storage:
/// the world recovers the concrete `SparseSet<T>` through `as_any` with a
/// checked downcast, and the deletion flush uses `discard` without knowing
/// the component type at all.
pub trait ComponentPool {
    /// Remove the component for `index` if present (idempotent).
    fn discard(&mut self, index: u32);

    /// Whether `index` has a component in this pool.
    fn contains_index(&self, index: u32) -> bool;

    /// Entity indices in dense order.
    fn entity_indices(&self) -> &[u32];

    /// Number of stored components.
    fn len(&self) -> usize;

    /// Upcast for the checked typed downcast.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for the checked typed downcast.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl fmt::Debug for dyn ComponentPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentPool")
            .field("len", &self.len())
            .finish()
    }
}

impl<T: 'static> ComponentPool for SparseSet<T> {
    fn discard(&mut self, index: u32) {
        self.remove(index);
    }

    fn contains_index(&self, index: u32) -> bool {
        self.contains(index)
    }

    fn entity_indices(&self) -> &[u32] {
        SparseSet::entity_indices(self)
    }

    fn len(&self) -> usize {
        SparseSet::len(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
