//! Bounds snapshots for the three collider shapes.
//!
//! World space is y-up: a rectangle's `top_left.y` is greater than its
//! `bottom_left.y`. Every bounds value is recomputed once per tick from the
//! owning entity's [`MapPosition`](crate::components::mapposition::MapPosition)
//! and shape configuration, so these types are plain `Copy` data.
//!
//! Each shape answers the four boundary queries the resolver uses to place two
//! colliders flush against each other:
//! - `lower_bound_at_x` / `upper_bound_at_x` – the bottom/top edge point at a given x
//! - `left_bound_at_y` / `right_bound_at_y` – the left/right edge point at a given y

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which concrete shape a collider or bounds value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Circle,
    Capsule,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ShapeKind::Box => "box",
            ShapeKind::Circle => "circle",
            ShapeKind::Capsule => "capsule",
        };
        f.write_str(name)
    }
}

/// Axis-aligned rectangle described by its four corners and midpoint.
///
/// Invariant: left corners share x, right corners share x, top corners share
/// y, bottom corners share y, and `center` is the midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectBounds {
    pub top_left: Vec2,
    pub top_right: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub center: Vec2,
}

impl RectBounds {
    /// Build a rectangle of `size` centred on `center`.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            top_left: Vec2::new(center.x - half.x, center.y + half.y),
            top_right: Vec2::new(center.x + half.x, center.y + half.y),
            bottom_left: Vec2::new(center.x - half.x, center.y - half.y),
            bottom_right: Vec2::new(center.x + half.x, center.y - half.y),
            center,
        }
    }

    /// Build the rectangle spanning two opposite corners in any order.
    pub fn from_points(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::from_center_size((min + max) * 0.5, max - min)
    }

    /// Translate every corner (and the center) by `offset`.
    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.top_left += offset;
        self.top_right += offset;
        self.bottom_left += offset;
        self.bottom_right += offset;
        self.center += offset;
        self
    }

    /// Move the left and right edges toward the center by `amount / 2` each.
    pub fn thinned_horizontally(mut self, amount: f32) -> Self {
        let half = amount * 0.5;
        self.top_left.x += half;
        self.bottom_left.x += half;
        self.top_right.x -= half;
        self.bottom_right.x -= half;
        self
    }

    /// Move the top and bottom edges toward the center by `amount / 2` each.
    pub fn thinned_vertically(mut self, amount: f32) -> Self {
        let half = amount * 0.5;
        self.top_left.y -= half;
        self.top_right.y -= half;
        self.bottom_left.y += half;
        self.bottom_right.y += half;
        self
    }

    pub fn min(&self) -> Vec2 {
        self.bottom_left
    }

    pub fn max(&self) -> Vec2 {
        self.top_right
    }

    pub fn width(&self) -> f32 {
        self.top_right.x - self.top_left.x
    }

    pub fn height(&self) -> f32 {
        self.top_left.y - self.bottom_left.y
    }

    /// Point of the rectangle (edge or interior) nearest to `point`.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        point.clamp(self.min(), self.max())
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub fn vertices(&self) -> [Vec2; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn lower_bound_at_x(&self, x: f32) -> Vec2 {
        Vec2::new(x, self.bottom_left.y)
    }

    pub fn upper_bound_at_x(&self, x: f32) -> Vec2 {
        Vec2::new(x, self.top_left.y)
    }

    pub fn left_bound_at_y(&self, y: f32) -> Vec2 {
        Vec2::new(self.top_left.x, y)
    }

    pub fn right_bound_at_y(&self, y: f32) -> Vec2 {
        Vec2::new(self.top_right.x, y)
    }
}

/// Circle described by center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleBounds {
    pub center: Vec2,
    pub radius: f32,
}

impl CircleBounds {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.center += offset;
        self
    }

    /// Vertical distance from the center to the edge at horizontal offset `dx`.
    ///
    /// The normalized offset is clamped to `[-1, 1]`, so coordinates outside
    /// the circle evaluate at its leftmost/rightmost point instead of NaN.
    fn half_height_at(&self, dx: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let angle = (dx / self.radius).clamp(-1.0, 1.0).acos();
        angle.sin() * self.radius
    }

    /// Horizontal distance from the center to the edge at vertical offset `dy`.
    fn half_width_at(&self, dy: f32) -> f32 {
        if self.radius <= 0.0 {
            return 0.0;
        }
        let angle = (dy / self.radius).clamp(-1.0, 1.0).asin();
        angle.cos() * self.radius
    }

    pub fn lower_bound_at_x(&self, x: f32) -> Vec2 {
        Vec2::new(x, self.center.y - self.half_height_at(x - self.center.x))
    }

    pub fn upper_bound_at_x(&self, x: f32) -> Vec2 {
        Vec2::new(x, self.center.y + self.half_height_at(x - self.center.x))
    }

    pub fn left_bound_at_y(&self, y: f32) -> Vec2 {
        Vec2::new(self.center.x - self.half_width_at(y - self.center.y), y)
    }

    pub fn right_bound_at_y(&self, y: f32) -> Vec2 {
        Vec2::new(self.center.x + self.half_width_at(y - self.center.y), y)
    }
}

/// Vertical capsule: a `2r`-wide rectangle with a circular cap centred on its
/// top edge and another on its bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapsuleBounds {
    pub rect: RectBounds,
    pub top_cap: CircleBounds,
    pub bottom_cap: CircleBounds,
}

impl CapsuleBounds {
    /// `length` is the distance between the two cap centers.
    pub fn from_center(center: Vec2, length: f32, radius: f32) -> Self {
        let rect = RectBounds::from_center_size(center, Vec2::new(radius * 2.0, length));
        Self {
            rect,
            top_cap: CircleBounds::new(Vec2::new(center.x, rect.top_left.y), radius),
            bottom_cap: CircleBounds::new(Vec2::new(center.x, rect.bottom_left.y), radius),
        }
    }

    pub fn with_offset(self, offset: Vec2) -> Self {
        Self {
            rect: self.rect.with_offset(offset),
            top_cap: self.top_cap.with_offset(offset),
            bottom_cap: self.bottom_cap.with_offset(offset),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center
    }

    pub fn radius(&self) -> f32 {
        self.top_cap.radius
    }

    /// Core segment from the bottom cap center to the top cap center.
    pub fn segment(&self) -> (Vec2, Vec2) {
        (self.bottom_cap.center, self.top_cap.center)
    }

    pub fn lower_bound_at_x(&self, x: f32) -> Vec2 {
        self.bottom_cap.lower_bound_at_x(x)
    }

    pub fn upper_bound_at_x(&self, x: f32) -> Vec2 {
        self.top_cap.upper_bound_at_x(x)
    }

    pub fn left_bound_at_y(&self, y: f32) -> Vec2 {
        self.side_part_at(y).left_bound_at_y(y)
    }

    pub fn right_bound_at_y(&self, y: f32) -> Vec2 {
        self.side_part_at(y).right_bound_at_y(y)
    }

    /// The part whose side edge is outermost at height `y`.
    fn side_part_at(&self, y: f32) -> CircleBounds {
        let center_y = y.clamp(self.bottom_cap.center.y, self.top_cap.center.y);
        if y > self.top_cap.center.y {
            self.top_cap
        } else if y < self.bottom_cap.center.y {
            self.bottom_cap
        } else {
            // Within the straight section the sides are vertical lines.
            CircleBounds::new(Vec2::new(self.rect.center.x, center_y), self.radius())
        }
    }
}

/// Bounds snapshot of any collider shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderBounds {
    Rect(RectBounds),
    Circle(CircleBounds),
    Capsule(CapsuleBounds),
}

impl Default for ColliderBounds {
    fn default() -> Self {
        ColliderBounds::Rect(RectBounds::default())
    }
}

impl ColliderBounds {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderBounds::Rect(_) => ShapeKind::Box,
            ColliderBounds::Circle(_) => ShapeKind::Circle,
            ColliderBounds::Capsule(_) => ShapeKind::Capsule,
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            ColliderBounds::Rect(r) => r.center,
            ColliderBounds::Circle(c) => c.center,
            ColliderBounds::Capsule(c) => c.center(),
        }
    }

    pub fn with_offset(self, offset: Vec2) -> Self {
        match self {
            ColliderBounds::Rect(r) => ColliderBounds::Rect(r.with_offset(offset)),
            ColliderBounds::Circle(c) => ColliderBounds::Circle(c.with_offset(offset)),
            ColliderBounds::Capsule(c) => ColliderBounds::Capsule(c.with_offset(offset)),
        }
    }

    pub fn lower_bound_at_x(&self, x: f32) -> Vec2 {
        match self {
            ColliderBounds::Rect(r) => r.lower_bound_at_x(x),
            ColliderBounds::Circle(c) => c.lower_bound_at_x(x),
            ColliderBounds::Capsule(c) => c.lower_bound_at_x(x),
        }
    }

    pub fn upper_bound_at_x(&self, x: f32) -> Vec2 {
        match self {
            ColliderBounds::Rect(r) => r.upper_bound_at_x(x),
            ColliderBounds::Circle(c) => c.upper_bound_at_x(x),
            ColliderBounds::Capsule(c) => c.upper_bound_at_x(x),
        }
    }

    pub fn left_bound_at_y(&self, y: f32) -> Vec2 {
        match self {
            ColliderBounds::Rect(r) => r.left_bound_at_y(y),
            ColliderBounds::Circle(c) => c.left_bound_at_y(y),
            ColliderBounds::Capsule(c) => c.left_bound_at_y(y),
        }
    }

    pub fn right_bound_at_y(&self, y: f32) -> Vec2 {
        match self {
            ColliderBounds::Rect(r) => r.right_bound_at_y(y),
            ColliderBounds::Circle(c) => c.right_bound_at_y(y),
            ColliderBounds::Capsule(c) => c.right_bound_at_y(y),
        }
    }
}
