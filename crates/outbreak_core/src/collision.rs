//! Axis-aligned rectangle queries.
//!
//! Pure geometry shared by movement resolution, ballistics, and AI
//! steering. No mutable state, no failure modes.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Axis-aligned rectangle in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create a square from its center and half-extent.
    #[must_use]
    pub fn from_center(center: Vec2, half: f32) -> Self {
        Self::new(center.x - half, center.y - half, half * 2.0, half * 2.0)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Axis-aligned overlap test. Closed intervals: touching edges
    /// count as an intersection.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && other.x <= self.right()
            && self.y <= other.bottom()
            && other.y <= self.bottom()
    }

    /// True if the point lies strictly inside the rectangle.
    #[must_use]
    pub fn contains_open(&self, point: Vec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }
}

/// True if `rect` intersects any rectangle in `obstacles`.
#[must_use]
pub fn any_intersect(rect: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| rect.intersects(o))
}
