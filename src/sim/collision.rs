//! Axis-aligned bounding box collision
//!
//! Screen coordinates: y grows downward, so `top < bottom`.

use glam::Vec2;

/// An axis-aligned box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Aabb {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Box of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self::new(
            center.x - half.x,
            center.y - half.y,
            center.x + half.x,
            center.y + half.y,
        )
    }

    /// Box of `size` whose bottom edge is centered on `anchor`
    pub fn from_bottom_center(anchor: Vec2, size: Vec2) -> Self {
        Self::new(
            anchor.x - size.x * 0.5,
            anchor.y - size.y,
            anchor.x + size.x * 0.5,
            anchor.y,
        )
    }

    /// Grow every edge outward by `amount`
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.left - amount,
            self.top - amount,
            self.right + amount,
            self.bottom + amount,
        )
    }

    /// Strict overlap: boxes that merely share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}
