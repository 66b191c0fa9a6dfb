//! Ledge Engine -- 2D platformer runtime on top of [`ledge_ecs`].
//!
//! This crate provides the simulation half of the runtime: swept-AABB
//! collision testing with broad-phase pruning and nearest-first resolution,
//! a per-frame force/movement model (gravity, walk easing, buffered jumps
//! with coyote time, dash), tile-map loading, and the [`Engine`] frame
//! driver that runs them in a fixed order.
//!
//! Rendering, audio, and input polling are host concerns: the host samples
//! input into an [`InputState`] before each step and reads [`Body`]
//! positions afterwards.
//!
//! # Quick Start
//!
//! ```
//! use ledge_engine::prelude::*;
//!
//! let mut engine = Engine::default();
//!
//! // A 3-tile floor and the player above it.
//! for x in 0..3 {
//!     spawn_tile(
//!         engine.world_mut(),
//!         Vec2::new(x as f32 * 16.0, 64.0),
//!         Vec2::new(16.0, 16.0),
//!     )?;
//! }
//! let player = spawn_player(engine.world_mut(), Vec2::new(16.0, 0.0))?;
//!
//! // Let the player fall onto the floor.
//! engine.run_steps(60, &InputState::default());
//!
//! let body = engine.world().get::<Body>(player)?;
//! assert!((body.position.y + body.size.y - 64.0).abs() < 1e-3);
//! # Ok::<(), ledge_engine::EngineError>(())
//! ```

#![deny(unsafe_code)]

pub mod body;
pub mod collision;
pub mod combat;
pub mod engine;
pub mod force;
pub mod map;
pub mod math;
pub mod movement;
pub mod physics;
pub mod spawn;
pub mod tags;

/// Re-export the ECS crate for convenience.
pub use ledge_ecs;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Reading a map file from disk failed.
    #[error("failed to read map file: {0}")]
    MapIo(#[from] std::io::Error),

    /// A map document was not valid JSON.
    #[error("failed to parse map document: {0}")]
    MapParse(#[from] serde_json::Error),

    /// A map document parsed but its contents are inconsistent.
    #[error("malformed map document: {0}")]
    MapFormat(String),

    /// An underlying component-store operation failed.
    #[error(transparent)]
    Ecs(#[from] ledge_ecs::EcsError),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use crate::body::Body;
    pub use crate::collision::{Collisions, Hit};
    pub use crate::engine::{Engine, EngineConfig};
    pub use crate::force::{Force, Jump, MovementConfig, PhysicsConfig};
    pub use crate::map::{load_map, load_map_str};
    pub use crate::math::Vec2;
    pub use crate::movement::InputState;
    pub use crate::spawn::{spawn_enemy, spawn_player, spawn_projectile, spawn_tile};
    pub use crate::tags::{EnemyTag, PlayerTag, ProjectileTag, TileTag};
    pub use crate::EngineError;

    pub use ledge_ecs::prelude::*;
}
