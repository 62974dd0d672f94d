//! Entity lifecycle hooks for the physics registries.
//!
//! These are world-level calls made when an entity carrying a [`Collider`]
//! or a [`RigidBody`] is activated or destroyed. A collider is classified
//! exactly once, here: non-static iff the entity has a [`RigidBody`] at
//! registration time. Attaching or removing a body afterwards does not
//! reclassify it.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::collider::Collider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::error::PhysicsError;
use crate::resources::collisionmanager::{ColliderClass, CollisionManager};
use crate::resources::physicsconfig::PhysicsConfig;

fn step_length(world: &World) -> f32 {
    world
        .get_resource::<PhysicsConfig>()
        .map(|c| c.delta_time)
        .unwrap_or_else(|| PhysicsConfig::new().delta_time)
}

/// Register the collider on `entity` (`RegisterCollider`).
///
/// Refreshes the collider bounds once so queries issued before the first
/// tick see the shape in place. A duplicate registration logs a warning and
/// returns the existing class without touching the registries.
pub fn register_collider(world: &mut World, entity: Entity) -> Result<ColliderClass, PhysicsError> {
    if let Some(class) = world
        .get_resource::<CollisionManager>()
        .and_then(|cm| cm.collider_class(entity))
    {
        warn!("Collider {:?} is already registered as {:?}", entity, class);
        return Ok(class);
    }

    let dt = step_length(world);
    let position = world
        .get::<MapPosition>(entity)
        .copied()
        .ok_or(PhysicsError::MissingComponent {
            entity,
            component: "MapPosition",
        })?;
    let velocity = world.get::<RigidBody>(entity).map(|rb| rb.velocity);
    let class = if velocity.is_some() {
        ColliderClass::NonStatic
    } else {
        ColliderClass::Static
    };

    let mut collider = world
        .get_mut::<Collider>(entity)
        .ok_or(PhysicsError::MissingComponent {
            entity,
            component: "Collider",
        })?;
    collider.update_bounds(position.pos, velocity, dt);

    world
        .get_resource_or_insert_with(CollisionManager::default)
        .register_collider(entity, class);
    debug!("Registered {:?} collider {:?}", class, entity);
    Ok(class)
}

/// Remove the collider on `entity` (`DeregisterCollider`). Unknown entities
/// are ignored.
pub fn deregister_collider(world: &mut World, entity: Entity) {
    if let Some(mut cm) = world.get_resource_mut::<CollisionManager>() {
        cm.deregister_collider(entity);
    }
}

/// Register the body on `entity` (`RegisterRigidBody`). Returns false on a
/// duplicate registration.
pub fn register_rigid_body(world: &mut World, entity: Entity) -> Result<bool, PhysicsError> {
    if world.get::<RigidBody>(entity).is_none() {
        return Err(PhysicsError::MissingComponent {
            entity,
            component: "RigidBody",
        });
    }
    Ok(world
        .get_resource_or_insert_with(CollisionManager::default)
        .register_rigid_body(entity))
}

/// Remove the body on `entity` (`DeregisterRigidBody`). Unknown entities are
/// ignored.
pub fn deregister_rigid_body(world: &mut World, entity: Entity) {
    if let Some(mut cm) = world.get_resource_mut::<CollisionManager>() {
        cm.deregister_rigid_body(entity);
    }
}

/// Destroy hook: drop every registration of `entity`, then despawn it.
pub fn despawn_physics_entity(world: &mut World, entity: Entity) {
    deregister_collider(world, entity);
    deregister_rigid_body(world, entity);
    if !world.despawn(entity) {
        debug!("despawn_physics_entity: {:?} did not exist", entity);
    }
}
