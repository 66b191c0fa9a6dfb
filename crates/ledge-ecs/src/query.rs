//! Conjunctive entity queries.
//!
//! Queries return a `Vec` of entity handles rather than borrowing iterators:
//! callers collect the ids, then fetch components per entity. That keeps the
//! borrow discipline trivial for single-threaded frame logic — systems are
//! free to mutate pools (and request deletions) after collecting, because no
//! pool borrow outlives the query call itself.
//!
//! Result order is unspecified but deterministic per call: the dense order
//! of the smallest participating pool.

use crate::component::ComponentTypeId;
use crate::entity::Entity;
use crate::world::World;

impl World {
    /// Every live entity holding all of the given component types.
    ///
    /// The general N-ary form; [`entities_with`](Self::entities_with) and
    /// [`entities_with2`](Self::entities_with2) are the common typed
    /// shorthands. Entities pending deletion still match — their components
    /// are not stripped until the flush.
    ///
    /// # Panics
    ///
    /// Panics if any id does not belong to this world's registry.
    pub fn entities_matching(&self, types: &[ComponentTypeId]) -> Vec<Entity> {
        for id in types {
            assert!(
                (id.0 as usize) < self.pools.len(),
                "{id:?} is not registered in this world"
            );
        }

        // Drive the scan from the smallest pool; membership tests in the
        // others are O(1).
        let Some(driver) = types
            .iter()
            .copied()
            .min_by_key(|id| self.pools[id.0 as usize].len())
        else {
            return Vec::new();
        };

        self.pools[driver.0 as usize]
            .entity_indices()
            .iter()
            .filter(|&&index| {
                types
                    .iter()
                    .all(|id| self.pools[id.0 as usize].contains_index(index))
            })
            .filter_map(|&index| self.allocator.live_entity_at(index))
            .collect()
    }

    /// Every live entity holding a `T` component.
    pub fn entities_with<T: 'static>(&self) -> Vec<Entity> {
        let t = self.lookup_or_panic::<T>();
        self.entities_matching(&[t])
    }

    /// Every live entity holding both an `A` and a `B` component.
    pub fn entities_with2<A: 'static, B: 'static>(&self) -> Vec<Entity> {
        let a = self.lookup_or_panic::<A>();
        let b = self.lookup_or_panic::<B>();
        self.entities_matching(&[a, b])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use crate::world::World;

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Pos {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    struct Vel {
        dx: f32,
    }

    #[derive(Debug, Default, Clone, Copy)]
    struct Marker;

    fn setup_world() -> World {
        let mut world = World::new();
        world.register_component::<Pos>("pos");
        world.register_component::<Vel>("vel");
        world.register_component::<Marker>("marker");
        world
    }

    #[test]
    fn single_component_query() {
        let mut world = setup_world();
        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();
        world.add::<Pos>(a).unwrap();
        world.add::<Pos>(c).unwrap();
        world.add::<Vel>(b).unwrap();

        let mut hits = world.entities_with::<Pos>();
        hits.sort();
        assert_eq!(hits, vec![a, c]);
    }

    #[test]
    fn conjunctive_query_requires_all_components() {
        let mut world = setup_world();
        let both = world.spawn();
        let pos_only = world.spawn();
        world.add::<Pos>(both).unwrap();
        world.add::<Vel>(both).unwrap();
        world.add::<Pos>(pos_only).unwrap();

        assert_eq!(world.entities_with2::<Pos, Vel>(), vec![both]);
    }

    #[test]
    fn query_skips_flushed_entities() {
        let mut world = setup_world();
        let keep = world.spawn();
        let doomed = world.spawn();
        world.add::<Pos>(keep).unwrap();
        world.add::<Pos>(doomed).unwrap();

        world.despawn(doomed);
        // Before the flush the pending entity still matches.
        assert_eq!(world.entities_with::<Pos>().len(), 2);

        world.flush_deletions();
        assert_eq!(world.entities_with::<Pos>(), vec![keep]);
    }

    #[test]
    fn nary_query_via_type_ids() {
        let mut world = setup_world();
        let e = world.spawn();
        world.add::<Pos>(e).unwrap();
        world.add::<Vel>(e).unwrap();
        world.add::<Marker>(e).unwrap();

        let partial = world.spawn();
        world.add::<Pos>(partial).unwrap();
        world.add::<Marker>(partial).unwrap();

        let ids = [
            world.registry().lookup::<Pos>().unwrap(),
            world.registry().lookup::<Vel>().unwrap(),
            world.registry().lookup::<Marker>().unwrap(),
        ];
        assert_eq!(world.entities_matching(&ids), vec![e]);
    }

    #[test]
    fn empty_type_list_matches_nothing() {
        let world = setup_world();
        assert!(world.entities_matching(&[]).is_empty());
    }

    #[test]
    fn query_result_is_deterministic_per_call() {
        let mut world = setup_world();
        for _ in 0..8 {
            let e = world.spawn();
            world.add::<Pos>(e).unwrap();
        }
        assert_eq!(world.entities_with::<Pos>(), world.entities_with::<Pos>());
    }
}
