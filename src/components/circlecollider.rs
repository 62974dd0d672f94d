use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::CircleBounds;

pub const DEFAULT_RADIUS_BUFFER: f32 = 0.01;

fn default_radius_buffer() -> f32 {
    DEFAULT_RADIUS_BUFFER
}

/// Circle shape configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleCollider {
    pub radius: f32,
    #[serde(default)]
    pub offset: Vec2,
    /// Radius shrink and lead distance used by the axis check bounds.
    #[serde(default = "default_radius_buffer")]
    pub radius_buffer: f32,
}

impl CircleCollider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            offset: Vec2::ZERO,
            radius_buffer: DEFAULT_RADIUS_BUFFER,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_radius_buffer(mut self, radius_buffer: f32) -> Self {
        self.radius_buffer = radius_buffer;
        self
    }

    pub fn bounds(&self, position: Vec2) -> CircleBounds {
        CircleBounds::new(position + self.offset, self.radius.abs())
    }

    /// Returns (vertical, horizontal) check bounds: the circle shrunk by the
    /// buffer, led by the buffer plus this tick's travel along the axis.
    /// A zero component leads downward/leftward.
    pub fn check_bounds(
        &self,
        bounds: &CircleBounds,
        velocity: Vec2,
        dt: f32,
    ) -> (CircleBounds, CircleBounds) {
        let radius = (bounds.radius - self.radius_buffer).max(0.0);

        let lead_y = if velocity.y <= 0.0 {
            -self.radius_buffer
        } else {
            self.radius_buffer
        };
        let lead_x = if velocity.x <= 0.0 {
            -self.radius_buffer
        } else {
            self.radius_buffer
        };

        (
            CircleBounds::new(
                bounds.center + Vec2::new(0.0, lead_y + velocity.y * dt),
                radius,
            ),
            CircleBounds::new(
                bounds.center + Vec2::new(lead_x + velocity.x * dt, 0.0),
                radius,
            ),
        )
    }
}
