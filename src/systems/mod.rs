//! Systems and world-level operations.
//!
//! - [`gamestate`] – run condition gating the simulation on `Playing`
//! - [`raycast`] – line probes and the parallel probe fan
//! - [`registration`] – collider and rigid body lifecycle hooks
//! - [`simulation`] – the fixed-step resolution pipeline

pub mod gamestate;
pub mod raycast;
pub mod registration;
pub mod simulation;
