//! ECS resources shared across systems.
//!
//! - [`collisionmanager`] – insertion-ordered collider and rigid body registries
//! - [`gamestate`] – the "game ready" gate for the simulation step
//! - [`physicsconfig`] – fixed step length, gravity and buffer tunables (INI)
//! - [`worldtime`] – simulated time and executed step count

pub mod collisionmanager;
pub mod gamestate;
pub mod physicsconfig;
pub mod worldtime;
