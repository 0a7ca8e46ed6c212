//! Projectile data and volley spawning.
//!
//! Only survivors fire. Every trigger spawns a volley of three bullets
//! fanned around the aim angle; ammunition is spent per volley, not per
//! bullet.

use serde::{Deserialize, Serialize};

use crate::collision::Rect;
use crate::math::Vec2;

/// Bullet bounding-box half-extent.
pub const BULLET_HALF_SIZE: f32 = 5.0;

/// Angular offset of the outer volley bullets for human triggers (±15°).
pub const HUMAN_SHOT_SPREAD: f32 = 0.2618;

/// Angular offset of the outer volley bullets for AI-aimed shots.
pub const AI_SHOT_SPREAD: f32 = 0.1;

/// A live projectile. No identity beyond its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    /// World position of the bullet center.
    pub position: Vec2,
    /// Unit direction of travel.
    pub direction: Vec2,
}

impl Bullet {
    /// Create a bullet heading along `angle` (radians).
    #[must_use]
    pub fn new(position: Vec2, angle: f32) -> Self {
        Self {
            position,
            direction: Vec2::from_angle(angle),
        }
    }

    /// Bounding box used for obstacle and character collision.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, BULLET_HALF_SIZE)
    }
}

/// Append a three-bullet volley fanned at `-spread`, `0`, `+spread`
/// around `angle`, all originating at `origin`.
pub fn spawn_volley(origin: Vec2, angle: f32, spread: f32, bullets: &mut Vec<Bullet>) {
    for offset in [-spread, 0.0, spread] {
        bullets.push(Bullet::new(origin, angle + offset));
    }
}
