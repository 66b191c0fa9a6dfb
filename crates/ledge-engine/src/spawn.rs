//! Entity spawners for the stock platformer cast.
//!
//! Each spawner allocates an entity and attaches the component set that
//! classifies it; callers adjust the returned handle's components afterwards
//! if they need anything non-default (the rendering collaborator attaches
//! its own sprite components the same way).

use ledge_ecs::entity::Entity;
use ledge_ecs::world::World;
use ledge_ecs::EcsError;

use crate::body::Body;
use crate::force::{Force, Jump};
use crate::math::Vec2;
use crate::tags::{EnemyTag, PlayerTag, ProjectileTag, TileTag};

/// Player and enemy body size in world units.
pub const ACTOR_SIZE: Vec2 = Vec2::new(16.0, 16.0);

/// Projectile body size in world units.
pub const PROJECTILE_SIZE: Vec2 = Vec2::new(8.0, 8.0);

/// Acceleration magnitude given to a freshly launched projectile.
const PROJECTILE_SPEED: f32 = 1.5;

/// Spawn the player at `position`: body, force, jump state, player tag.
pub fn spawn_player(world: &mut World, position: Vec2) -> Result<Entity, EcsError> {
    let player = world.spawn();
    world.add::<PlayerTag>(player)?;
    *world.add::<Body>(player)? = Body::new(position, ACTOR_SIZE);
    world.add::<Force>(player)?;
    world.add::<Jump>(player)?;
    Ok(player)
}

/// Spawn an enemy at `position`: same kit as the player, enemy tag.
pub fn spawn_enemy(world: &mut World, position: Vec2) -> Result<Entity, EcsError> {
    let enemy = world.spawn();
    world.add::<EnemyTag>(enemy)?;
    *world.add::<Body>(enemy)? = Body::new(position, ACTOR_SIZE);
    world.add::<Force>(enemy)?;
    world.add::<Jump>(enemy)?;
    Ok(enemy)
}

/// Spawn a static collision tile covering `position .. position + size`.
pub fn spawn_tile(world: &mut World, position: Vec2, size: Vec2) -> Result<Entity, EcsError> {
    let tile = world.spawn();
    world.add::<TileTag>(tile)?;
    *world.add::<Body>(tile)? = Body::new(position, size);
    Ok(tile)
}

/// Spawn a projectile at `origin` accelerating toward `target`.
///
/// The acceleration is the direction to the target normalized to a fixed
/// magnitude; a target on top of the origin leaves the projectile inert
/// rather than dividing by zero.
pub fn spawn_projectile(world: &mut World, origin: Vec2, target: Vec2) -> Result<Entity, EcsError> {
    let projectile = world.spawn();
    world.add::<ProjectileTag>(projectile)?;
    *world.add::<Body>(projectile)? = Body::new(origin, PROJECTILE_SIZE);

    let force = world.add::<Force>(projectile)?;
    let reach = target - origin;
    let distance = reach.magnitude();
    if distance > 0.0 {
        force.acceleration = reach * (PROJECTILE_SPEED / distance);
    }
    Ok(projectile)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
