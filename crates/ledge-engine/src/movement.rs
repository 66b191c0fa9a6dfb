//! Input-driven movement: turns the frame's input snapshot into force
//! mutations on the player entity.
//!
//! Runs before the physics step in the same tick, so physics always sees
//! this frame's input. Input-device polling itself is the host's job; the
//! engine only consumes the plain [`InputState`] snapshot handed to
//! [`Engine::step`](crate::engine::Engine::step).

use ledge_ecs::world::World;

use crate::force::{Force, Jump, MovementConfig};
use crate::math::Vec2;
use crate::tags::PlayerTag;

/// One frame of input, as sampled by the host.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct InputState {
    /// Move-left held.
    pub left: bool,
    /// Move-right held.
    pub right: bool,
    /// Jump pressed this frame.
    pub jump: bool,
    /// Dash triggered this frame.
    pub dash: bool,
    /// Attack/fire pressed this frame.
    pub fire: bool,
    /// Aim position in world coordinates (projectile target).
    pub cursor: Vec2,
}

/// Apply the frame's input to every player-tagged entity.
///
/// Entities missing a `Force` are skipped (recoverable miss, not an error
/// path); a missing `Jump` only disables the jump handling.
pub fn update_movement(world: &mut World, input: &InputState, config: &MovementConfig) {
    for player in world.entities_with::<PlayerTag>() {
        let Ok(&force) = world.get::<Force>(player) else {
            continue;
        };
        let mut force = force;

        force.walk(input.left, input.right, config);
        force.dash(input.left, input.right, input.dash, config);

        if let Ok(&jump) = world.get::<Jump>(player) {
            let mut jump = jump;
            force.update_jump(&mut jump, input.jump, config);
            if let Ok(slot) = world.get_mut::<Jump>(player) {
                *slot = jump;
            }
        }

        if let Ok(slot) = world.get_mut::<Force>(player) {
            *slot = force;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
