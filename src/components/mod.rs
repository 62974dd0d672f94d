//! ECS components for physics entities.
//!
//! Submodules overview:
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`boxcollider`] – axis-aligned box shape configuration
//! - [`circlecollider`] – circle shape configuration
//! - [`capsulecollider`] – vertical capsule shape configuration
//! - [`collider`] – polymorphic collider holding the per-tick bounds snapshot
//! - [`rigidbody`] – kinematic body with velocity, named forces and integration hooks

pub mod boxcollider;
pub mod capsulecollider;
pub mod circlecollider;
pub mod collider;
pub mod mapposition;
pub mod rigidbody;
