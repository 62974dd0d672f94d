//! Line queries over registered colliders.
//!
//! Gameplay code (hit detection, projectiles, ledge probes) uses these; the
//! resolver never does. Only enabled non-static colliders are probed, in
//! registry order.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use rustc_hash::FxHashSet;

use crate::components::collider::Collider;
use crate::error::PhysicsError;
use crate::resources::collisionmanager::CollisionManager;

/// Every enabled non-static collider struck by the segment from `origin`
/// along `direction` for `distance` units (`CheckLineIntersectWithCollider`).
pub fn check_line_intersect_with_colliders(
    world: &World,
    origin: Vec2,
    direction: Vec2,
    distance: f32,
) -> Vec<Entity> {
    let Some(cm) = world.get_resource::<CollisionManager>() else {
        return Vec::new();
    };
    cm.non_static_colliders()
        .iter()
        .copied()
        .filter(|&entity| match world.get::<Collider>(entity) {
            Some(collider) => {
                collider.enabled && collider.line_intersect(origin, direction, distance)
            }
            None => {
                debug!("Line probe skipping {:?}: missing Collider", entity);
                false
            }
        })
        .collect()
}

/// Cast `ray_count` parallel probes evenly spaced from `a` to `b` and collect
/// the distinct colliders hit, `querying` excluded (`CastLineFan`).
///
/// The result is a set; callers must not rely on any ordering.
pub fn cast_line_fan(
    world: &World,
    querying: Option<Entity>,
    a: Vec2,
    b: Vec2,
    direction: Vec2,
    distance: f32,
    ray_count: usize,
) -> FxHashSet<Entity> {
    let mut hits = FxHashSet::default();
    if ray_count == 0 {
        return hits;
    }
    let step = if ray_count > 1 {
        (b - a) / (ray_count - 1) as f32
    } else {
        Vec2::ZERO
    };
    for i in 0..ray_count {
        let origin = a + step * i as f32;
        hits.extend(
            check_line_intersect_with_colliders(world, origin, direction, distance)
                .into_iter()
                .filter(|e| Some(*e) != querying),
        );
    }
    hits
}

/// Overlap of the colliders on two entities using their current bounds
/// (`ColliderIntersect`).
pub fn collider_intersect(world: &World, a: Entity, b: Entity) -> Result<bool, PhysicsError> {
    let get = |entity: Entity| {
        world
            .get::<Collider>(entity)
            .ok_or(PhysicsError::MissingComponent {
                entity,
                component: "Collider",
            })
    };
    Ok(get(a)?.intersects(get(b)?))
}
