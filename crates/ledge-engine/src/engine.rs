//! The frame driver.
//!
//! An [`Engine`] owns the ECS [`World`] and advances it one frame per
//! [`step`](Engine::step) call, in a fixed order:
//!
//! 1. deferred-deletion flush (frame boundary; no pool is mutated while any
//!    system iterates),
//! 2. movement (this frame's input becomes force mutations),
//! 3. combat (impulses and spawns for the same tick),
//! 4. physics (collision resolution and position integration).
//!
//! The order is a guarantee, not a configuration: physics must see this
//! frame's input, and the host reads post-resolution [`Body`] positions
//! after `step` returns (sprite sync and rendering live host-side).
//!
//! Everything is single-threaded and frame-stepped; one `step` call per
//! host frame tick, running to completion.

use serde::{Deserialize, Serialize};
use tracing::debug;

use ledge_ecs::world::World;

use crate::body::Body;
use crate::combat;
use crate::force::{Force, Jump, MovementConfig, PhysicsConfig};
use crate::movement::{self, InputState};
use crate::physics;
use crate::tags::{EnemyTag, PlayerTag, ProjectileTag, TileTag};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// All engine tunables, deserializable from a JSON config document.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gravity and integration tunables.
    pub physics: PhysicsConfig,
    /// Walk/jump/dash tunables.
    pub movement: MovementConfig,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// The platformer runtime: an ECS world plus the fixed frame pipeline.
#[derive(Debug)]
pub struct Engine {
    world: World,
    config: EngineConfig,
    tick_counter: u64,
}

impl Engine {
    /// Create an engine with the core component set registered.
    ///
    /// Collaborators register their own components (sprites, AI state, ...)
    /// through [`world_mut`](Self::world_mut) before the first step.
    pub fn new(config: EngineConfig) -> Self {
        let mut world = World::new();
        world.register_component::<Body>("body");
        world.register_component::<Force>("force");
        world.register_component::<Jump>("jump");
        world.register_component::<PlayerTag>("player_tag");
        world.register_component::<EnemyTag>("enemy_tag");
        world.register_component::<TileTag>("tile_tag");
        world.register_component::<ProjectileTag>("projectile_tag");
        debug!(components = world.registry().len(), "engine world ready");

        Self {
            world,
            config,
            tick_counter: 0,
        }
    }

    /// Advance the simulation by one frame.
    pub fn step(&mut self, input: &InputState) {
        self.world.flush_deletions();
        movement::update_movement(&mut self.world, input, &self.config.movement);
        combat::update_combat(&mut self.world, input);
        physics::step_physics(&mut self.world, &self.config.physics);
        self.tick_counter += 1;
    }

    /// Advance `count` frames with the same input each frame.
    pub fn run_steps(&mut self, count: u64, input: &InputState) {
        for _ in 0..count {
            self.step(input);
        }
    }

    /// The number of frames stepped so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Read-only access to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the ECS world (setup, spawning, map loading).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec2;
    use crate::spawn;

    #[test]
    fn step_counts_ticks() {
        let mut engine = Engine::default();
        engine.run_steps(10, &InputState::default());
        assert_eq!(engine.tick_count(), 10);
    }

    #[test]
    fn deletions_flush_at_the_start_of_the_next_step() {
        let mut engine = Engine::default();
        let tile = spawn::spawn_tile(engine.world_mut(), Vec2::ZERO, Vec2::new(16.0, 16.0))
            .unwrap();

        engine.world_mut().despawn(tile);
        // Deferred: still alive until a step runs.
        assert!(engine.world().is_alive(tile));

        engine.step(&InputState::default());
        assert!(!engine.world().is_alive(tile));
    }

    #[test]
    fn input_reaches_physics_in_the_same_tick() {
        let mut engine = Engine::default();
        spawn::spawn_tile(engine.world_mut(), Vec2::new(0.0, 32.0), Vec2::new(16.0, 16.0))
            .unwrap();
        let player = spawn::spawn_player(engine.world_mut(), Vec2::new(0.0, 16.0)).unwrap();

        // Settle onto the floor.
        engine.run_steps(5, &InputState::default());
        let grounded_y = engine.world().get::<Body>(player).unwrap().position.y;
        assert!(engine
            .world()
            .get::<Force>(player)
            .unwrap()
            .collisions
            .down);

        // A jump press must move the body upward within the same step.
        engine.step(&InputState {
            jump: true,
            ..InputState::default()
        });
        let after = engine.world().get::<Body>(player).unwrap().position.y;
        assert!(after < grounded_y, "jump did not lift: {after} vs {grounded_y}");
    }

    #[test]
    fn config_round_trips_through_json() {
        let json = r#"{ "physics": { "gravity": 0.5 }, "movement": { "max_jumps": 2 } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.physics.gravity, 0.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.physics.max_fall, PhysicsConfig::default().max_fall);
        assert_eq!(config.movement.max_jumps, 2);
        assert_eq!(
            config.movement.dash_speed,
            MovementConfig::default().dash_speed
        );
    }
}
