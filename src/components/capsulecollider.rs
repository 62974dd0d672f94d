use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::geometry::CapsuleBounds;

pub const DEFAULT_CAPSULE_BUFFER: f32 = 0.02;

fn default_buffer() -> f32 {
    DEFAULT_CAPSULE_BUFFER
}

/// Vertical capsule shape configuration.
///
/// `size` is the length of the straight section; the full height is
/// `size + 2 * radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleCollider {
    pub size: f32,
    pub radius: f32,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default = "default_buffer")]
    pub buffer: f32,
}

impl CapsuleCollider {
    pub fn new(size: f32, radius: f32) -> Self {
        Self {
            size,
            radius,
            offset: Vec2::ZERO,
            buffer: DEFAULT_CAPSULE_BUFFER,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_buffer(mut self, buffer: f32) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn bounds(&self, position: Vec2) -> CapsuleBounds {
        CapsuleBounds::from_center(position + self.offset, self.size.abs(), self.radius.abs())
    }

    /// Returns (vertical, horizontal) check bounds: the capsule with its
    /// radius reduced by half the buffer, pushed along the axis of travel by
    /// `max(buffer, |v * dt|)`.
    pub fn check_bounds(
        &self,
        bounds: &CapsuleBounds,
        velocity: Vec2,
        dt: f32,
    ) -> (CapsuleBounds, CapsuleBounds) {
        let length = bounds.top_cap.center.y - bounds.bottom_cap.center.y;
        let radius = (bounds.radius() - self.buffer * 0.5).max(0.0);
        let thinned = CapsuleBounds::from_center(bounds.center(), length, radius);

        let lead = |v: f32| {
            if v.abs() > 0.0 {
                v.signum() * self.buffer.max((v * dt).abs())
            } else {
                0.0
            }
        };

        (
            thinned.with_offset(Vec2::new(0.0, lead(velocity.y))),
            thinned.with_offset(Vec2::new(lead(velocity.x), 0.0)),
        )
    }
}
