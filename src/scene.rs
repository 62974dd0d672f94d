//! Data-driven scene loading.
//!
//! A scene is a JSON file listing static colliders and bodies. Vectors are
//! `[x, y]` arrays. Buffers and gravity values left out of an entry are taken
//! from the [`PhysicsConfig`] resource.
//!
//! ```json
//! {
//!   "statics": [
//!     { "position": [0, 0], "shape": { "type": "box", "size": [20, 1] } }
//!   ],
//!   "bodies": [
//!     {
//!       "name": "player",
//!       "position": [0, 4],
//!       "velocity": [3, 0],
//!       "shape": { "type": "capsule", "size": 1, "radius": 0.5 }
//!     }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::info;
use serde::{Deserialize, Serialize};

use crate::components::boxcollider::BoxCollider;
use crate::components::capsulecollider::CapsuleCollider;
use crate::components::circlecollider::CircleCollider;
use crate::components::collider::{Collider, ColliderShape};
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::error::PhysicsError;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::systems::registration::{register_collider, register_rigid_body};

fn default_true() -> bool {
    true
}

/// Shape entry; unset buffers fall back to the config values.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneShape {
    Box {
        size: Vec2,
        #[serde(default)]
        offset: Vec2,
        horizontal_buffer: Option<f32>,
        vertical_buffer: Option<f32>,
    },
    Circle {
        radius: f32,
        #[serde(default)]
        offset: Vec2,
        radius_buffer: Option<f32>,
    },
    Capsule {
        size: f32,
        radius: f32,
        #[serde(default)]
        offset: Vec2,
        buffer: Option<f32>,
    },
}

impl SceneShape {
    pub fn to_shape(&self, config: &PhysicsConfig) -> ColliderShape {
        match *self {
            SceneShape::Box {
                size,
                offset,
                horizontal_buffer,
                vertical_buffer,
            } => ColliderShape::Box(
                BoxCollider::new(size.x, size.y)
                    .with_offset(offset)
                    .with_buffers(
                        horizontal_buffer.unwrap_or(config.horizontal_buffer),
                        vertical_buffer.unwrap_or(config.vertical_buffer),
                    ),
            ),
            SceneShape::Circle {
                radius,
                offset,
                radius_buffer,
            } => ColliderShape::Circle(
                CircleCollider::new(radius)
                    .with_offset(offset)
                    .with_radius_buffer(radius_buffer.unwrap_or(config.radius_buffer)),
            ),
            SceneShape::Capsule {
                size,
                radius,
                offset,
                buffer,
            } => ColliderShape::Capsule(
                CapsuleCollider::new(size, radius)
                    .with_offset(offset)
                    .with_buffer(buffer.unwrap_or(config.capsule_buffer)),
            ),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneStatic {
    pub position: Vec2,
    pub shape: SceneShape,
    #[serde(default)]
    pub trigger: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SceneBody {
    #[serde(default)]
    pub name: Option<String>,
    pub position: Vec2,
    #[serde(default)]
    pub velocity: Vec2,
    /// A body without a shape is integrated but never collides.
    #[serde(default)]
    pub shape: Option<SceneShape>,
    #[serde(default)]
    pub trigger: bool,
    #[serde(default = "default_true")]
    pub use_gravity: bool,
    /// Overrides the configured gravity.
    #[serde(default)]
    pub gravity: Option<f32>,
    /// Overrides the configured terminal fall speed.
    #[serde(default)]
    pub max_fall_speed: Option<f32>,
}

/// Structure representing a scene loaded from JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SceneData {
    #[serde(default)]
    pub statics: Vec<SceneStatic>,
    #[serde(default)]
    pub bodies: Vec<SceneBody>,
}

impl SceneData {
    pub fn load_from_file(path: &str) -> Result<Self, PhysicsError> {
        let file_content = std::fs::read_to_string(path)
            .map_err(|e| PhysicsError::Scene(format!("Failed to read {}: {}", path, e)))?;
        Self::from_json(&file_content)
    }

    pub fn from_json(contents: &str) -> Result<Self, PhysicsError> {
        serde_json::from_str(contents).map_err(|e| PhysicsError::Scene(e.to_string()))
    }
}

/// Entities created by [`spawn_scene`], in file order.
#[derive(Debug, Clone, Default)]
pub struct SpawnedScene {
    pub statics: Vec<Entity>,
    pub bodies: Vec<(Option<String>, Entity)>,
}

/// Spawn and register every entry of `scene`, statics first.
pub fn spawn_scene(world: &mut World, scene: &SceneData) -> Result<SpawnedScene, PhysicsError> {
    let config = world
        .get_resource::<PhysicsConfig>()
        .cloned()
        .unwrap_or_default();
    let mut spawned = SpawnedScene::default();

    for entry in &scene.statics {
        let collider = Collider::new(entry.shape.to_shape(&config)).with_trigger(entry.trigger);
        let entity = world
            .spawn((MapPosition::from_vec(entry.position), collider))
            .id();
        register_collider(world, entity)?;
        spawned.statics.push(entity);
    }

    for entry in &scene.bodies {
        let mut body = if entry.use_gravity {
            RigidBody::with_gravity(entry.gravity.unwrap_or(config.gravity))
        } else {
            RigidBody::new()
        }
        .with_velocity(entry.velocity);
        body.max_fall_speed = entry
            .max_fall_speed
            .map(|v| Some(v).filter(|v| *v > 0.0))
            .unwrap_or_else(|| config.fall_speed_limit());

        let entity = world
            .spawn((MapPosition::from_vec(entry.position), body))
            .id();
        if let Some(shape) = &entry.shape {
            world
                .entity_mut(entity)
                .insert(Collider::new(shape.to_shape(&config)).with_trigger(entry.trigger));
            register_collider(world, entity)?;
        }
        register_rigid_body(world, entity)?;
        spawned.bodies.push((entry.name.clone(), entity));
    }

    info!(
        "Spawned scene: {} static colliders, {} bodies",
        spawned.statics.len(),
        spawned.bodies.len()
    );
    Ok(spawned)
}
