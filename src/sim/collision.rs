//! Entity vs plank and entity vs playfield checks
//!
//! Discrete: overlap is tested at the post-move position only, so an entity
//! faster than the plank is thick can tunnel through it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::paddle::Paddle;
use super::state::{Bounds, Entity};

/// Result of resolving one entity for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Still in play
    Falling,
    /// Touched the plank
    Caught,
    /// Fell fully below the bottom edge
    MissedBottom,
    /// Left through the left, right or top edge
    OutOfBounds,
}

impl Outcome {
    /// Whether the entity should be removed from play
    #[inline]
    pub fn is_terminal(&self) -> bool {
        *self != Outcome::Falling
    }
}

/// Circle vs axis-aligned rectangle overlap (touching counts)
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect_min: Vec2, rect_max: Vec2) -> bool {
    let closest = center.clamp(rect_min, rect_max);
    center.distance_squared(closest) <= radius * radius
}

/// Classify an entity against the plank and the playfield.
///
/// Priority: Caught, then MissedBottom, then OutOfBounds. The playfield
/// tests use the far edge of the circle: an entity is missed only once its
/// top edge is below `bounds.height`, and out of bounds only once it is
/// entirely past the left, right or top edge. A centre just past the bottom
/// still resolves to `Falling`.
pub fn resolve(entity: &Entity, paddle: &Paddle, bounds: &Bounds) -> Outcome {
    let (rect_min, rect_max) = paddle.rect();
    if circle_rect_overlap(entity.pos, entity.radius, rect_min, rect_max) {
        return Outcome::Caught;
    }

    let top = entity.pos.y - entity.radius;
    let bottom = entity.pos.y + entity.radius;
    let left = entity.pos.x - entity.radius;
    let right = entity.pos.x + entity.radius;

    if top > bounds.height {
        return Outcome::MissedBottom;
    }
    if right < 0.0 || left > bounds.width || bottom < 0.0 {
        return Outcome::OutOfBounds;
    }

    Outcome::Falling
}
