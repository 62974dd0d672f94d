//! Collider and rigid body registries.
//!
//! The [`CollisionManager`] holds weak references (entity ids) to every
//! registered collider and body. It never owns their lifetime; entities are
//! spawned and despawned by the caller and registered through
//! [`crate::systems::registration`].
//!
//! Iteration order is insertion order. Removal keeps the relative order of
//! the remaining entries so pair iteration in the simulation step is stable
//! across runs and across rollback replays.

use bevy_ecs::prelude::*;
use log::warn;
use rustc_hash::FxHashSet;

/// Static/non-static classification fixed at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColliderClass {
    /// No rigid body attached; never moves.
    Static,
    /// Has a rigid body; resolved every tick.
    NonStatic,
}

#[derive(Debug, Default, Clone)]
struct Registry {
    order: Vec<Entity>,
    members: FxHashSet<Entity>,
}

impl Registry {
    fn insert(&mut self, entity: Entity) -> bool {
        if !self.members.insert(entity) {
            return false;
        }
        self.order.push(entity);
        true
    }

    fn remove(&mut self, entity: Entity) -> bool {
        if !self.members.remove(&entity) {
            return false;
        }
        self.order.retain(|e| *e != entity);
        true
    }

    fn contains(&self, entity: Entity) -> bool {
        self.members.contains(&entity)
    }
}

/// Registries consumed by the simulation step and the line queries.
#[derive(Resource, Debug, Default, Clone)]
pub struct CollisionManager {
    static_colliders: Registry,
    non_static_colliders: Registry,
    rigid_bodies: Registry,
}

impl CollisionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a collider into the registry matching its class.
    ///
    /// Returns false and logs a warning when the entity is already registered
    /// in either collider registry; the registries are left unchanged.
    pub fn register_collider(&mut self, entity: Entity, class: ColliderClass) -> bool {
        if self.static_colliders.contains(entity) || self.non_static_colliders.contains(entity) {
            warn!("Collider {:?} is already registered", entity);
            return false;
        }
        match class {
            ColliderClass::Static => self.static_colliders.insert(entity),
            ColliderClass::NonStatic => self.non_static_colliders.insert(entity),
        }
    }

    /// Remove a collider. Unknown entities are ignored.
    pub fn deregister_collider(&mut self, entity: Entity) -> bool {
        self.static_colliders.remove(entity) || self.non_static_colliders.remove(entity)
    }

    pub fn register_rigid_body(&mut self, entity: Entity) -> bool {
        if !self.rigid_bodies.insert(entity) {
            warn!("RigidBody {:?} is already registered", entity);
            return false;
        }
        true
    }

    pub fn deregister_rigid_body(&mut self, entity: Entity) -> bool {
        self.rigid_bodies.remove(entity)
    }

    pub fn static_colliders(&self) -> &[Entity] {
        &self.static_colliders.order
    }

    pub fn non_static_colliders(&self) -> &[Entity] {
        &self.non_static_colliders.order
    }

    pub fn rigid_bodies(&self) -> &[Entity] {
        &self.rigid_bodies.order
    }

    /// Class of a registered collider, `None` when unknown.
    pub fn collider_class(&self, entity: Entity) -> Option<ColliderClass> {
        if self.static_colliders.contains(entity) {
            Some(ColliderClass::Static)
        } else if self.non_static_colliders.contains(entity) {
            Some(ColliderClass::NonStatic)
        } else {
            None
        }
    }

    pub fn has_rigid_body(&self, entity: Entity) -> bool {
        self.rigid_bodies.contains(entity)
    }

    pub fn clear(&mut self) {
        self.static_colliders = Registry::default();
        self.non_static_colliders = Registry::default();
        self.rigid_bodies = Registry::default();
    }
}
