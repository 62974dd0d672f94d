//! Events emitted by the physics systems.
//!
//! - [`grounded`] – a body landed on a static collider this tick

pub mod grounded;
