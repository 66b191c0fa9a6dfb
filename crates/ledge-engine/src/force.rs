//! Per-entity movement state and the force model.
//!
//! A [`Force`] carries the split the platformer feel depends on:
//! `velocity` is instantaneous movement, consumed and zeroed every physics
//! step, while `acceleration` is persisting momentum (gravity, walk easing,
//! jump impulses) that is re-added to velocity each frame. Dashes and
//! knockbacks write `velocity` directly for one-frame impulses.
//!
//! All rates are fixed per-frame steps, not dt- or mass-scaled: the runtime
//! is frame-stepped and deliberately tuned in per-frame units.

use serde::{Deserialize, Serialize};

use crate::collision::Collisions;
use crate::math::Vec2;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Gravity and integration tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added per frame.
    pub gravity: f32,
    /// Clamp on accumulated downward acceleration.
    pub max_fall: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.3,
            max_fall: 5.0,
        }
    }
}

/// Walk/jump/dash tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal acceleration added per frame while a direction is held.
    pub walk_accel: f32,
    /// Horizontal deceleration toward zero per frame.
    pub friction: f32,
    /// Upward acceleration impulse applied when a jump fires.
    pub jump_impulse: f32,
    /// Frames a jump press stays buffered waiting for the ground.
    pub jump_buffer_frames: u32,
    /// Frames after leaving a ledge during which a jump still works.
    pub coyote_frames: u32,
    /// Jump credits refilled on landing (1 = single jump, 2 = double jump).
    pub max_jumps: u32,
    /// Horizontal speed set directly by a dash.
    pub dash_speed: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_accel: 0.9,
            friction: 0.6,
            jump_impulse: 5.0,
            jump_buffer_frames: 3,
            coyote_frames: 5,
            max_jumps: 1,
            dash_speed: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Movement state for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Force {
    /// Instantaneous movement, consumed by the physics step.
    pub velocity: Vec2,
    /// Persisting momentum, re-added to velocity each frame.
    pub acceleration: Vec2,
    /// Maximum horizontal speed from walking.
    pub speed: f32,
    /// Directional contact flags from the last physics step.
    pub collisions: Collisions,
}

impl Default for Force {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            speed: 3.0,
            collisions: Collisions::default(),
        }
    }
}

/// Jump bookkeeping for one entity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jump {
    /// Frames since the entity was last grounded.
    pub air_time: u32,
    /// Frames remaining in which a buffered jump press is still honored.
    pub jump_registered: u32,
    /// Remaining jump credits.
    pub jumps: u32,
}

impl Force {
    /// Apply one frame of gravity.
    ///
    /// Grounded entities keep a small residual downward pull (capped at one
    /// frame's gravity) instead of zero: with exactly zero downward force
    /// the next step produces no down-contact and the entity floats.
    pub fn apply_gravity(&mut self, config: &PhysicsConfig) {
        self.acceleration.y = (self.acceleration.y + config.gravity).min(config.max_fall);
        if self.collisions.down {
            self.acceleration.y = self.acceleration.y.min(config.gravity);
        }
    }

    /// One frame of horizontal walking: friction decays the current
    /// momentum toward zero, then held directions ease it toward
    /// `±self.speed` by a fixed step.
    pub fn walk(&mut self, left: bool, right: bool, config: &MovementConfig) {
        if self.acceleration.x < 0.0 {
            self.acceleration.x = (self.acceleration.x + config.friction).min(0.0);
        } else {
            self.acceleration.x = (self.acceleration.x - config.friction).max(0.0);
        }

        if left {
            self.acceleration.x = (self.acceleration.x - config.walk_accel).max(-self.speed);
        }
        if right {
            self.acceleration.x = (self.acceleration.x + config.walk_accel).min(self.speed);
        }
    }

    /// One frame of jump bookkeeping.
    ///
    /// A press arms the buffer; the jump itself fires on the first frame
    /// where a credit remains and the entity is within the coyote window,
    /// which yields both input buffering (press slightly before landing)
    /// and coyote time (press slightly after walking off a ledge).
    pub fn update_jump(&mut self, jump: &mut Jump, pressed: bool, config: &MovementConfig) {
        if pressed {
            jump.jump_registered = config.jump_buffer_frames;
        }

        // Bonking a ceiling kills upward momentum.
        if self.collisions.up {
            self.acceleration.y = self.acceleration.y.max(0.0);
        }

        if self.collisions.down {
            jump.air_time = 0;
            jump.jumps = config.max_jumps;
        } else {
            jump.air_time += 1;
        }

        if jump.jump_registered > 0 {
            if jump.jumps > 0 && jump.air_time < config.coyote_frames {
                self.acceleration.y -= config.jump_impulse;
                jump.jumps -= 1;
                jump.jump_registered = 0;
            } else {
                jump.jump_registered -= 1;
            }
        }
    }

    /// Dash: set horizontal velocity to a fixed high value in the held
    /// direction. Instantaneous, not accumulated.
    pub fn dash(&mut self, left: bool, right: bool, triggered: bool, config: &MovementConfig) {
        if !triggered {
            return;
        }
        if right {
            self.velocity.x = config.dash_speed;
        } else if left {
            self.velocity.x = -config.dash_speed;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
