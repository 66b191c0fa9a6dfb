//! The per-frame physics step: force integration and multi-candidate
//! ordered collision resolution.
//!
//! For every entity holding a [`Body`] and a [`Force`], one step:
//!
//! 1. applies gravity to the persisting acceleration,
//! 2. folds acceleration into this frame's velocity,
//! 3. resolves the velocity against every candidate tile (see below),
//! 4. integrates the resolved velocity into the position,
//! 5. zeroes the velocity (acceleration persists to the next frame).
//!
//! Candidate resolution gathers every tile that survives the broad phase
//! *and* narrow-phase hits the current velocity, sorts them by distance —
//! **nearest collision first** — and then re-tests each in order against the
//! velocity as modified by the resolutions before it. The ordering is not
//! cosmetic: resolving a far contact before a near one moves the body
//! through geometry it should have stopped at, which is exactly how a
//! corner made of two adjacent tiles gets tunneled through.

use tracing::trace;

use ledge_ecs::entity::Entity;
use ledge_ecs::world::World;

use crate::body::Body;
use crate::collision::{self, Collisions};
use crate::force::{Force, PhysicsConfig};
use crate::math::Vec2;
use crate::tags::TileTag;

/// Advance every moving body by one frame.
pub fn step_physics(world: &mut World, config: &PhysicsConfig) {
    let movers = world.entities_with2::<Body, Force>();
    let tiles = world.entities_with2::<TileTag, Body>();

    for mover in movers {
        // Copy out, mutate, write back: no pool borrow is held while tile
        // bodies are read during resolution.
        let (Ok(&body), Ok(&force)) = (world.get::<Body>(mover), world.get::<Force>(mover))
        else {
            continue;
        };
        let mut body = body;
        let mut force = force;

        force.apply_gravity(config);

        // Momentum becomes this frame's motion.
        force.velocity += force.acceleration;

        resolve_against_tiles(world, &body, &mut force, &tiles);

        body.position += force.velocity;
        force.velocity = Vec2::ZERO;

        if let Ok(slot) = world.get_mut::<Body>(mover) {
            *slot = body;
        }
        if let Ok(slot) = world.get_mut::<Force>(mover) {
            *slot = force;
        }
    }
}

/// Resolve `force.velocity` against the given tiles, nearest first, and
/// repopulate `force.collisions`.
pub(crate) fn resolve_against_tiles(
    world: &World,
    body: &Body,
    force: &mut Force,
    tiles: &[Entity],
) {
    // Gather candidates: broad phase culls, narrow phase confirms.
    let mut contacts: Vec<(Entity, f32)> = Vec::new();
    for &tile in tiles {
        let Ok(tile_body) = world.get::<Body>(tile) else {
            continue;
        };
        if !collision::broad_phase(body, tile_body, force.velocity) {
            continue;
        }
        if collision::sweep(body, tile_body, force.velocity).is_some() {
            let distance = body.position.distance(tile_body.position);
            contacts.push((tile, distance));
        }
    }

    // Nearest collision first. The sort is stable so equidistant corner
    // tiles resolve in deterministic query order.
    contacts.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    force.collisions = Collisions::default();

    for (tile, _) in contacts {
        let Ok(tile_body) = world.get::<Body>(tile) else {
            continue;
        };
        // Re-test: a prior resolution in this loop may have shortened the
        // velocity enough that this contact no longer happens.
        if let Some(hit) = collision::sweep(body, tile_body, force.velocity) {
            force.velocity = collision::resolve_velocity(force.velocity, &hit);
            force.collisions.apply_normal(hit.normal);
            trace!(?tile, time = hit.time, "resolved tile contact");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
