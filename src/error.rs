//! Error type shared by registration, queries, configuration and scenes.
//!
//! None of these errors are fatal to a running simulation: the tick itself
//! never returns an error, it logs and treats the failing query as "no
//! collision".

use bevy_ecs::entity::Entity;
use thiserror::Error;

use crate::geometry::ShapeKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// The operation has no implementation for this shape.
    #[error("{operation} is not supported for {shape} colliders")]
    Unsupported {
        operation: &'static str,
        shape: ShapeKind,
    },

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("scene error: {0}")]
    Scene(String),
}
