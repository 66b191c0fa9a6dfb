//! Combat systems: melee raycast attack and charge projectiles.
//!
//! Both run after movement and before physics in the frame, so the impulses
//! they write are consumed by the same tick's physics step.

use tracing::{debug, warn};

use ledge_ecs::entity::Entity;
use ledge_ecs::world::World;

use crate::body::Body;
use crate::collision;
use crate::force::Force;
use crate::math::Vec2;
use crate::movement::InputState;
use crate::spawn;
use crate::tags::{EnemyTag, PlayerTag, ProjectileTag, TileTag};

/// Enemies within this distance of the player can be struck by the melee
/// attack.
pub const ATTACK_RANGE: f32 = 80.0;

/// Knockback velocity written to a struck enemy (x toward the strike
/// direction, y upward).
const KNOCKBACK: Vec2 = Vec2::new(30.0, 30.0);

/// Residual upward acceleration left on a launched enemy.
const LAUNCH_LIFT: f32 = 0.6;

/// Entities within this distance of a detonation get pushed.
pub const EXPLOSION_RADIUS: f32 = 32.0;

/// Radial impulse applied by a detonation.
const EXPLOSION_IMPULSE: Vec2 = Vec2::new(5.0, 6.5);

/// Run the frame's combat: on fire, melee-strike reachable enemies and
/// launch a charge projectile at the cursor; then detonate any projectile
/// that collided during the previous physics step.
pub fn update_combat(world: &mut World, input: &InputState) {
    if input.fire {
        melee_attack(world);
        launch_projectile(world, input.cursor);
    }
    detonate_projectiles(world);
}

/// Knock back every enemy in range with an unobstructed line from the
/// player's center.
fn melee_attack(world: &mut World) {
    let Some(&player) = world.entities_with::<PlayerTag>().first() else {
        return;
    };
    let Ok(&player_body) = world.get::<Body>(player) else {
        return;
    };
    let tiles = world.entities_with2::<TileTag, Body>();

    for enemy in world.entities_with::<EnemyTag>() {
        let Ok(&enemy_body) = world.get::<Body>(enemy) else {
            continue;
        };
        if player_body.position.distance(enemy_body.position) >= ATTACK_RANGE {
            continue;
        }

        let ray = enemy_body.center() - player_body.center();
        if ray_blocked_by_tiles(world, &player_body, ray, &tiles) {
            continue;
        }

        let Ok(force) = world.get_mut::<Force>(enemy) else {
            continue;
        };
        force.velocity.x = if player_body.position.x > enemy_body.position.x {
            -KNOCKBACK.x
        } else {
            KNOCKBACK.x
        };
        force.velocity.y = -KNOCKBACK.y;
        force.acceleration.y = -LAUNCH_LIFT;
        debug!(?enemy, "melee strike landed");
    }
}

/// Whether any tile sits on the ray (within its length) from the body's
/// center.
fn ray_blocked_by_tiles(world: &World, from: &Body, ray: Vec2, tiles: &[Entity]) -> bool {
    let origin = from.center();
    tiles.iter().any(|&tile| {
        let Ok(tile_body) = world.get::<Body>(tile) else {
            return false;
        };
        // Broad phase culls tiles nowhere near the ray's reach.
        if !collision::broad_phase(from, tile_body, ray) {
            return false;
        }
        matches!(
            collision::ray_vs_body(tile_body, origin, ray),
            Some(hit) if hit.time >= 0.0 && hit.time < 1.0
        )
    })
}

/// Spawn a charge projectile at the player's center aimed at the cursor.
fn launch_projectile(world: &mut World, cursor: Vec2) {
    let Some(&player) = world.entities_with::<PlayerTag>().first() else {
        return;
    };
    let Ok(&player_body) = world.get::<Body>(player) else {
        return;
    };
    if let Err(err) = spawn::spawn_projectile(world, player_body.center(), cursor) {
        warn!(%err, "failed to launch projectile");
    }
}

/// Detonate every projectile whose last physics step reported a contact:
/// push all movers in the blast radius away from it (other projectiles are
/// immune) and despawn the projectile. The despawn is deferred, so the
/// explosion is processed exactly once.
fn detonate_projectiles(world: &mut World) {
    for projectile in world.entities_with2::<ProjectileTag, Force>() {
        let Ok(&force) = world.get::<Force>(projectile) else {
            continue;
        };
        if !force.collisions.collided() {
            continue;
        }
        let Ok(&projectile_body) = world.get::<Body>(projectile) else {
            continue;
        };
        let blast = projectile_body.center();

        for target in world.entities_with2::<Body, Force>() {
            if world.has::<ProjectileTag>(target) {
                continue;
            }
            let Ok(&target_body) = world.get::<Body>(target) else {
                continue;
            };
            let target_center = target_body.center();
            if blast.distance(target_center) >= EXPLOSION_RADIUS {
                continue;
            }
            let Ok(target_force) = world.get_mut::<Force>(target) else {
                continue;
            };
            if blast.x > target_center.x {
                target_force.acceleration.x -= EXPLOSION_IMPULSE.x;
            } else {
                target_force.acceleration.x += EXPLOSION_IMPULSE.x;
            }
            if blast.y > target_center.y {
                target_force.acceleration.y -= EXPLOSION_IMPULSE.y;
            } else {
                target_force.acceleration.y += EXPLOSION_IMPULSE.y;
            }
        }

        debug!(?projectile, "projectile detonated");
        world.despawn(projectile);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
