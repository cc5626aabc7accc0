//! Axis-aligned box tests for the flyer

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::flyer::OBSTACLE_WIDTH;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    /// Strict overlap on the horizontal axis
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.min.x < right && self.max.x > left
    }
}

/// Actor overlaps the pair horizontally while not fully inside the gap
pub fn actor_hits_obstacle(actor: &Aabb, obstacle: &Obstacle) -> bool {
    actor.overlaps_x(obstacle.x, obstacle.x + OBSTACLE_WIDTH)
        && (actor.min.y < obstacle.top_height || actor.max.y > obstacle.bottom_y)
}
