use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::RectBounds;

pub const DEFAULT_BOX_BUFFER: f32 = 0.02;

fn default_buffer() -> f32 {
    DEFAULT_BOX_BUFFER
}

/// Axis-aligned box shape configuration.
///
/// The buffers thin the box along the axis *not* being tested so a body
/// sliding along a floor or wall does not catch the corner of the surface it
/// is resting on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxCollider {
    pub size: Vec2,
    #[serde(default)]
    pub offset: Vec2,
    /// Total horizontal shrink applied to the vertical check bounds.
    #[serde(default = "default_buffer")]
    pub horizontal_buffer: f32,
    /// Total vertical shrink applied to the horizontal check bounds.
    #[serde(default = "default_buffer")]
    pub vertical_buffer: f32,
}

impl BoxCollider {
    /// Create a BoxCollider with given size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
            horizontal_buffer: DEFAULT_BOX_BUFFER,
            vertical_buffer: DEFAULT_BOX_BUFFER,
        }
    }

    /// Modify BoxCollider with given offset
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_buffers(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_buffer = horizontal;
        self.vertical_buffer = vertical;
        self
    }

    /// Rectangle for a given entity position.
    /// Handles negative size by normalizing it.
    pub fn bounds(&self, position: Vec2) -> RectBounds {
        RectBounds::from_center_size(position + self.offset, self.size.abs())
    }

    /// Returns (vertical, horizontal) check bounds.
    ///
    /// Each variant is thinned on the orthogonal axis and pushed along its own
    /// axis in the direction of travel by `max(buffer, |v * dt|)`, so a body
    /// that would cross a thin surface within one tick still touches it.
    pub fn check_bounds(
        &self,
        bounds: &RectBounds,
        velocity: Vec2,
        dt: f32,
    ) -> (RectBounds, RectBounds) {
        let vertical = bounds.thinned_horizontally(self.horizontal_buffer);
        let horizontal = bounds.thinned_vertically(self.vertical_buffer);

        let mut vertical_offset = 0.0;
        let mut horizontal_offset = 0.0;
        if velocity.y.abs() > 0.0 {
            vertical_offset =
                velocity.y.signum() * self.vertical_buffer.max((velocity.y * dt).abs());
        }
        if velocity.x.abs() > 0.0 {
            horizontal_offset =
                velocity.x.signum() * self.horizontal_buffer.max((velocity.x * dt).abs());
        }

        (
            vertical.with_offset(Vec2::new(0.0, vertical_offset)),
            horizontal.with_offset(Vec2::new(horizontal_offset, 0.0)),
        )
    }

    /// Point containment in world space.
    pub fn contains_point(&self, position: Vec2, point: Vec2) -> bool {
        let b = self.bounds(position);
        point.x >= b.min().x && point.x <= b.max().x && point.y >= b.min().y && point.y <= b.max().y
    }
}
