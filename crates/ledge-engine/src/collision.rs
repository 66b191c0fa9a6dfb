//! Swept AABB collision testing.
//!
//! Collision between a moving body and a static body is tested in two
//! phases:
//!
//! - **Broad phase** ([`broad_phase`]): a cheap static overlap test between
//!   the candidate and the mover's motion envelope (the union of its current
//!   and velocity-displaced positions). Rejects the large majority of tiles
//!   before any division happens.
//! - **Narrow phase** ([`sweep`]): the candidate is expanded on all sides by
//!   half the mover's size (a Minkowski sum), reducing the problem to a ray
//!   cast from the mover's *center* along its velocity, solved with the slab
//!   method ([`ray_vs_body`]).
//!
//! A hit reports the entry time along the velocity (`0.0` = already
//! touching, `1.0` = a full frame away) and an axis-aligned contact normal.
//! Only hits with time in `[0, 1)` count: anything at `t >= 1` happens after
//! this frame's motion completes.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::math::Vec2;

// ---------------------------------------------------------------------------
// Hit
// ---------------------------------------------------------------------------

/// A narrow-phase contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Entry time along the velocity vector.
    pub time: f32,
    /// Axis-aligned outward normal of the struck surface.
    pub normal: Vec2,
}

// ---------------------------------------------------------------------------
// Ray vs box (slab method)
// ---------------------------------------------------------------------------

/// Cast a ray from `origin` along `velocity` against `body`.
///
/// Returns the entry time and contact normal, or `None` when the ray misses.
/// The entry time is *not* restricted to `[0, 1)` here; [`sweep`] applies
/// that window.
///
/// A zero velocity component divides to `±inf`, which the slab comparisons
/// handle naturally — except the `0/0` case (origin exactly on a slab edge),
/// which yields NaN and is rejected as a miss so the poison never reaches
/// the caller.
pub fn ray_vs_body(body: &Body, origin: Vec2, velocity: Vec2) -> Option<Hit> {
    // Per-axis entry/exit times.
    let mut near = Vec2::new(
        (body.position.x - origin.x) / velocity.x,
        (body.position.y - origin.y) / velocity.y,
    );
    let mut far = Vec2::new(
        (body.position.x + body.size.x - origin.x) / velocity.x,
        (body.position.y + body.size.y - origin.y) / velocity.y,
    );

    if near.x.is_nan() || near.y.is_nan() || far.x.is_nan() || far.y.is_nan() {
        return None;
    }

    // Negative velocity enters through the far edge first.
    if near.x > far.x {
        std::mem::swap(&mut near.x, &mut far.x);
    }
    if near.y > far.y {
        std::mem::swap(&mut near.y, &mut far.y);
    }

    // The ray misses unless the per-axis intervals overlap.
    if near.x > far.y || near.y > far.x {
        return None;
    }

    // Entire box behind the ray origin.
    let exit = far.x.min(far.y);
    if exit < 0.0 {
        return None;
    }

    let time = near.x.max(near.y);

    // The blocking axis is the one entered last; the normal opposes the
    // velocity on that axis.
    let normal = if near.x > near.y {
        if velocity.x < 0.0 {
            Vec2::new(1.0, 0.0)
        } else {
            Vec2::new(-1.0, 0.0)
        }
    } else if velocity.y < 0.0 {
        Vec2::new(0.0, 1.0)
    } else {
        Vec2::new(0.0, -1.0)
    };

    Some(Hit { time, normal })
}

// ---------------------------------------------------------------------------
// Swept body vs body
// ---------------------------------------------------------------------------

/// Swept test of `mover` (displaced by `velocity` over one frame) against
/// the static `target`.
///
/// A zero velocity never collides. Hits at `t >= 1` are discarded: they
/// would occur after this frame's motion completes.
pub fn sweep(mover: &Body, target: &Body, velocity: Vec2) -> Option<Hit> {
    if velocity.x == 0.0 && velocity.y == 0.0 {
        return None;
    }

    // Inflate the target by half the mover's size so the mover collapses to
    // the point at its center.
    let expanded = Body::new(
        target.position - mover.size * 0.5,
        target.size + mover.size,
    );

    let hit = ray_vs_body(&expanded, mover.center(), velocity)?;
    (hit.time >= 0.0 && hit.time < 1.0).then_some(hit)
}

/// Broad-phase candidate test: does `target` overlap the mover's motion
/// envelope?
///
/// The envelope covers the mover's current and displaced positions, so any
/// body the swept test could hit overlaps it (no false negatives); the
/// converse does not hold, which is the point — survivors go on to the
/// narrow phase.
pub fn broad_phase(mover: &Body, target: &Body, velocity: Vec2) -> bool {
    let envelope = Body::new(
        Vec2::new(
            mover.position.x.min(mover.position.x + velocity.x),
            mover.position.y.min(mover.position.y + velocity.y),
        ),
        Vec2::new(
            mover.size.x + velocity.x.abs(),
            mover.size.y + velocity.y.abs(),
        ),
    );
    envelope.overlaps(target)
}

/// Trim `velocity` so the motion stops at the hit: the portion of movement
/// beyond the entry time is removed along the normal axis.
pub fn resolve_velocity(velocity: Vec2, hit: &Hit) -> Vec2 {
    Vec2::new(
        velocity.x + hit.normal.x * (velocity.x * (1.0 - hit.time)).abs(),
        velocity.y + hit.normal.y * (velocity.y * (1.0 - hit.time)).abs(),
    )
}

// ---------------------------------------------------------------------------
// Collisions -- per-entity directional contact flags
// ---------------------------------------------------------------------------

/// Directional contact flags for one physics step.
///
/// Reset to all-false at the start of each step, then OR-ed in during
/// candidate resolution.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collisions {
    /// Contact on the left face (struck something while moving left).
    pub left: bool,
    /// Contact on the right face.
    pub right: bool,
    /// Contact above (head bonk).
    pub up: bool,
    /// Contact below (grounded).
    pub down: bool,
}

impl Collisions {
    /// Whether any contact occurred this step.
    pub fn collided(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// OR in the direction implied by an axis-aligned contact normal.
    pub fn apply_normal(&mut self, normal: Vec2) {
        if normal.x == 1.0 {
            self.left = true;
        } else if normal.x == -1.0 {
            self.right = true;
        }
        if normal.y == 1.0 {
            self.up = true;
        } else if normal.y == -1.0 {
            self.down = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
