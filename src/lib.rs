//! Kinematic 2D collision library.
//!
//! A fixed-timestep, axis-aligned kinematic resolver built on `bevy_ecs`.
//! Colliders (box, circle, capsule) and rigid bodies are ordinary components;
//! the [`resources::collisionmanager::CollisionManager`] keeps ordered
//! registries and [`systems::simulation::simulation_step`] resolves one tick.

pub mod components;
pub mod error;
pub mod events;
pub mod geometry;
pub mod resources;
pub mod scene;
pub mod systems;
