//! Axis-aligned rigid bodies.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// An axis-aligned rectangle: top-left `position` plus `size`
/// (width/height).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner.
    pub position: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl Body {
    /// Construct a body from its top-left corner and size.
    pub const fn new(position: Vec2, size: Vec2) -> Self {
        Self { position, size }
    }

    /// The center point, `position + size / 2`.
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.position.x + self.size.x / 2.0,
            self.position.y + self.size.y / 2.0,
        )
    }

    /// Static AABB overlap test. Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        let (left_a, top_a) = (self.position.x, self.position.y);
        let (right_a, bottom_a) = (left_a + self.size.x, top_a + self.size.y);

        let (left_b, top_b) = (other.position.x, other.position.y);
        let (right_b, bottom_b) = (left_b + other.size.x, top_b + other.size.y);

        if left_a >= right_b || right_a <= left_b {
            return false;
        }
        if top_a >= bottom_b || bottom_a <= top_b {
            return false;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
