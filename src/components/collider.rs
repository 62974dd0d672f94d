//! Polymorphic collider component.
//!
//! A [`Collider`] owns one [`ColliderShape`] configuration and the bounds
//! snapshot computed from it every tick. Non-static colliders (those whose
//! entity carries a [`RigidBody`]) additionally keep two axis check bounds:
//! - `vertical_check_bounds` – thinned horizontally, pushed along `velocity.y`
//! - `horizontal_check_bounds` – thinned vertically, pushed along `velocity.x`
//!
//! Static colliders keep both check bounds equal to `bounds`.
//!
//! The axis tests ([`Collider::intersect_vertically`] and
//! [`Collider::intersect_horizontally`]) are what the simulation step uses to
//! resolve contacts: on overlap they snap the moving entity's position so the
//! two boundaries are flush and zero the velocity component on that axis.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::error;
use serde::{Deserialize, Serialize};

use crate::components::boxcollider::BoxCollider;
use crate::components::capsulecollider::CapsuleCollider;
use crate::components::circlecollider::CircleCollider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::error::PhysicsError;
use crate::geometry::intersect::{
    bounds_intersect, closest_point_on_segment, line_intersect_capsule, line_intersect_circle,
    line_intersect_rect,
};
use crate::geometry::{ColliderBounds, ShapeKind};

/// Shape configuration, one variant per supported collider kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColliderShape {
    Box(BoxCollider),
    Circle(CircleCollider),
    Capsule(CapsuleCollider),
}

impl ColliderShape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            ColliderShape::Box(_) => ShapeKind::Box,
            ColliderShape::Circle(_) => ShapeKind::Circle,
            ColliderShape::Capsule(_) => ShapeKind::Capsule,
        }
    }

    pub fn bounds(&self, position: Vec2) -> ColliderBounds {
        match self {
            ColliderShape::Box(b) => ColliderBounds::Rect(b.bounds(position)),
            ColliderShape::Circle(c) => ColliderBounds::Circle(c.bounds(position)),
            ColliderShape::Capsule(c) => ColliderBounds::Capsule(c.bounds(position)),
        }
    }

    /// Returns (vertical, horizontal) check bounds derived from `bounds`.
    fn check_bounds(
        &self,
        bounds: &ColliderBounds,
        velocity: Vec2,
        dt: f32,
    ) -> (ColliderBounds, ColliderBounds) {
        match (self, bounds) {
            (ColliderShape::Box(shape), ColliderBounds::Rect(rect)) => {
                let (v, h) = shape.check_bounds(rect, velocity, dt);
                (ColliderBounds::Rect(v), ColliderBounds::Rect(h))
            }
            (ColliderShape::Circle(shape), ColliderBounds::Circle(circle)) => {
                let (v, h) = shape.check_bounds(circle, velocity, dt);
                (ColliderBounds::Circle(v), ColliderBounds::Circle(h))
            }
            (ColliderShape::Capsule(shape), ColliderBounds::Capsule(capsule)) => {
                let (v, h) = shape.check_bounds(capsule, velocity, dt);
                (ColliderBounds::Capsule(v), ColliderBounds::Capsule(h))
            }
            // bounds are always produced by the same shape
            _ => (*bounds, *bounds),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    /// Triggers are skipped by resolution; queries still see them.
    pub is_trigger: bool,
    pub enabled: bool,
    pub bounds: ColliderBounds,
    /// Bounds from the refresh before the latest one.
    pub previous_bounds: ColliderBounds,
    pub vertical_check_bounds: ColliderBounds,
    pub horizontal_check_bounds: ColliderBounds,
}

impl Collider {
    /// Create an enabled, non-trigger collider with bounds at the origin.
    pub fn new(shape: ColliderShape) -> Self {
        let bounds = shape.bounds(Vec2::ZERO);
        Self {
            shape,
            is_trigger: false,
            enabled: true,
            bounds,
            previous_bounds: bounds,
            vertical_check_bounds: bounds,
            horizontal_check_bounds: bounds,
        }
    }

    pub fn boxed(width: f32, height: f32) -> Self {
        Self::new(ColliderShape::Box(BoxCollider::new(width, height)))
    }

    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::Circle(CircleCollider::new(radius)))
    }

    pub fn capsule(size: f32, radius: f32) -> Self {
        Self::new(ColliderShape::Capsule(CapsuleCollider::new(size, radius)))
    }

    pub fn with_trigger(mut self, is_trigger: bool) -> Self {
        self.is_trigger = is_trigger;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Recompute bounds from the entity position (`UpdateBoundsOfCollider`).
    ///
    /// `velocity` is `None` for static colliders; non-static colliders pass
    /// their body's current velocity so the check bounds lead in the
    /// direction of travel by one tick of `dt`.
    pub fn update_bounds(&mut self, position: Vec2, velocity: Option<Vec2>, dt: f32) {
        self.previous_bounds = self.bounds;
        self.bounds = self.shape.bounds(position);
        match velocity {
            Some(velocity) => {
                let (vertical, horizontal) = self.shape.check_bounds(&self.bounds, velocity, dt);
                self.vertical_check_bounds = vertical;
                self.horizontal_check_bounds = horizontal;
            }
            None => {
                self.vertical_check_bounds = self.bounds;
                self.horizontal_check_bounds = self.bounds;
            }
        }
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Overlap test against any other shape (`ColliderIntersect`).
    pub fn intersects(&self, other: &Collider) -> bool {
        bounds_intersect(&self.bounds, &other.bounds)
    }

    /// Segment probe from `origin` along `direction` for `length` units.
    pub fn line_intersect(&self, origin: Vec2, direction: Vec2, length: f32) -> bool {
        let end = origin + direction * length;
        match &self.bounds {
            ColliderBounds::Rect(r) => line_intersect_rect(r, origin, direction, length),
            ColliderBounds::Circle(c) => line_intersect_circle(c, origin, end),
            ColliderBounds::Capsule(c) => line_intersect_capsule(c, origin, end),
        }
    }

    pub fn lower_bound_at_x(&self, x: f32) -> Vec2 {
        self.bounds.lower_bound_at_x(x)
    }

    pub fn upper_bound_at_x(&self, x: f32) -> Vec2 {
        self.bounds.upper_bound_at_x(x)
    }

    pub fn left_bound_at_y(&self, y: f32) -> Vec2 {
        self.bounds.left_bound_at_y(y)
    }

    pub fn right_bound_at_y(&self, y: f32) -> Vec2 {
        self.bounds.right_bound_at_y(y)
    }

    /// General overlap push-out. No shape implements it; resolution goes
    /// through the axis tests instead.
    pub fn push_object_outside_of_collider(&self, other: &Collider) -> Result<(), PhysicsError> {
        let err = PhysicsError::Unsupported {
            operation: "push_object_outside_of_collider",
            shape: self.kind(),
        };
        error!("{err} (other collider is a {})", other.kind());
        Err(err)
    }

    /// Vertical contact test (`ColliderIntersectVertically`).
    ///
    /// Returns false when `other` is this collider or the body is not moving
    /// vertically. On overlap of the vertical check bounds with `other`, the
    /// position is snapped flush against `other`'s lower (moving up) or upper
    /// (moving down) boundary and `velocity.y` is zeroed.
    pub fn intersect_vertically(
        &self,
        body: &mut RigidBody,
        position: &mut MapPosition,
        other: &Collider,
    ) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        if body.velocity.y == 0.0 {
            return false;
        }
        if !bounds_intersect(&self.vertical_check_bounds, &other.bounds) {
            return false;
        }
        self.snap_vertically(position, other, body.velocity.y >= 0.0);
        body.velocity.y = 0.0;
        true
    }

    /// Horizontal contact test (`ColliderIntersectHorizontally`); mirror of
    /// [`Collider::intersect_vertically`] on the x axis.
    pub fn intersect_horizontally(
        &self,
        body: &mut RigidBody,
        position: &mut MapPosition,
        other: &Collider,
    ) -> bool {
        if std::ptr::eq(self, other) {
            return false;
        }
        if body.velocity.x == 0.0 {
            return false;
        }
        if !bounds_intersect(&self.horizontal_check_bounds, &other.bounds) {
            return false;
        }
        self.snap_horizontally(position, other, body.velocity.x > 0.0);
        body.velocity.x = 0.0;
        true
    }

    /// Move `position` so this collider's top (moving up) or bottom edge is
    /// flush with `other`'s facing edge at the contact x.
    pub fn snap_vertically(&self, position: &mut MapPosition, other: &Collider, moving_up: bool) {
        let x = self.contact_point(other, Axis::Vertical, moving_up).x;
        position.pos.y = if moving_up {
            other.lower_bound_at_x(x).y - (self.upper_bound_at_x(x).y - position.pos.y)
        } else {
            other.upper_bound_at_x(x).y - (self.lower_bound_at_x(x).y - position.pos.y)
        };
    }

    /// Move `position` so this collider's right (moving right) or left edge is
    /// flush with `other`'s facing edge at the contact y.
    pub fn snap_horizontally(
        &self,
        position: &mut MapPosition,
        other: &Collider,
        moving_right: bool,
    ) {
        let y = self.contact_point(other, Axis::Horizontal, moving_right).y;
        position.pos.x = if moving_right {
            other.left_bound_at_y(y).x - (self.right_bound_at_y(y).x - position.pos.x)
        } else {
            other.right_bound_at_y(y).x - (self.left_bound_at_y(y).x - position.pos.x)
        };
    }

    /// Coordinate at which both boundaries are evaluated when snapping.
    fn contact_point(&self, other: &Collider, axis: Axis, positive: bool) -> Vec2 {
        match (&self.bounds, &other.bounds) {
            // Both edges are flat, any point along them gives the same answer.
            (ColliderBounds::Rect(r), ColliderBounds::Rect(_)) => match axis {
                Axis::Vertical if positive => r.top_left,
                Axis::Vertical => r.top_right,
                Axis::Horizontal => r.top_right,
            },
            (ColliderBounds::Rect(r), o) => r.closest_point(core_point_toward(o, r.center)),
            (s, o) => {
                let own = core_point_toward(s, o.center());
                let target = core_point_toward(o, own);
                let r_self = core_radius(s);
                let total = r_self + core_radius(o);
                if total <= 0.0 {
                    own
                } else {
                    own + (target - own) * (r_self / total)
                }
            }
        }
    }
}

/// Point of the shape's core (the rectangle itself, a circle's center or a
/// capsule's segment) nearest to `point`.
fn core_point_toward(bounds: &ColliderBounds, point: Vec2) -> Vec2 {
    match bounds {
        ColliderBounds::Rect(r) => r.closest_point(point),
        ColliderBounds::Circle(c) => c.center,
        ColliderBounds::Capsule(c) => {
            let (start, end) = c.segment();
            closest_point_on_segment(point, start, end)
        }
    }
}

fn core_radius(bounds: &ColliderBounds) -> f32 {
    match bounds {
        ColliderBounds::Rect(_) => 0.0,
        ColliderBounds::Circle(c) => c.radius,
        ColliderBounds::Capsule(c) => c.radius(),
    }
}
