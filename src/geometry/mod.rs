//! Geometry primitives used by colliders.
//!
//! - [`bounds`] – rectangle, circle and capsule bounds plus boundary-at-coordinate queries
//! - [`intersect`] – stateless pairwise intersection and line predicates

pub mod bounds;
pub mod intersect;

pub use bounds::{CapsuleBounds, CircleBounds, ColliderBounds, RectBounds, ShapeKind};
