//! Per-tick kinematic collision resolution.
//!
//! [`simulation_step`] is an exclusive system. It copies every registered
//! collider and body into an ordered frame, runs the pipeline on plain data
//! and writes the components back:
//!
//! 1. skip when the [`GameState`] gate is not `Playing`
//! 2. refresh the bounds of every enabled non-static collider
//! 3. gravity hook on every enabled body
//! 4. refresh again and snapshot each non-static body's velocity
//! 5. moving-vs-moving horizontal pass over unordered pairs `(i, j), i < j`
//! 6. moving-vs-static pass, vertical then horizontal for every pair
//! 7. integration hook on every enabled body
//! 8. restore each non-static body's velocity from the snapshot
//!
//! Velocity components zeroed by a contact in steps 5 and 6 are written into
//! the snapshot, so they stay zero after step 8. The merged velocity of
//! step 5 only moves the bodies for this tick's integration.
//!
//! All iteration follows registry insertion order, so two worlds fed the same
//! inputs produce bit-identical results.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::collider::Collider;
use crate::components::mapposition::MapPosition;
use crate::components::rigidbody::RigidBody;
use crate::events::grounded::GroundedEvent;
use crate::geometry::ColliderBounds;
use crate::geometry::intersect::bounds_intersect;
use crate::resources::collisionmanager::CollisionManager;
use crate::resources::gamestate::GameState;
use crate::resources::physicsconfig::PhysicsConfig;
use crate::resources::worldtime::WorldTime;

/// A non-static collider together with its body and position.
#[derive(Debug, Clone)]
struct Mover {
    entity: Entity,
    collider: Collider,
    body: RigidBody,
    position: MapPosition,
    original_velocity: Vec2,
}

impl Mover {
    fn refresh(&mut self, dt: f32) {
        self.collider
            .update_bounds(self.position.pos, Some(self.body.velocity), dt);
    }

    fn resolves(&self) -> bool {
        self.collider.enabled && !self.collider.is_trigger
    }
}

#[derive(Debug, Clone)]
struct Solid {
    collider: Collider,
}

impl Solid {
    fn resolves(&self) -> bool {
        self.collider.enabled && !self.collider.is_trigger
    }
}

/// A registered body without a registered non-static collider.
#[derive(Debug, Clone)]
struct FreeBody {
    entity: Entity,
    body: RigidBody,
    position: MapPosition,
}

#[derive(Debug, Clone, Copy)]
enum BodySlot {
    Mover(usize),
    Free(usize),
}

/// Ordered working copy of everything one tick touches.
#[derive(Debug, Default)]
struct Frame {
    movers: Vec<Mover>,
    solids: Vec<Solid>,
    free_bodies: Vec<FreeBody>,
    bodies: Vec<BodySlot>,
    grounded: Vec<Entity>,
}

impl Frame {
    fn gather(world: &World, cm: &CollisionManager) -> Self {
        let mut frame = Frame::default();
        let mut mover_index: FxHashMap<Entity, usize> = FxHashMap::default();

        for &entity in cm.non_static_colliders() {
            let (Some(collider), Some(body), Some(position)) = (
                world.get::<Collider>(entity),
                world.get::<RigidBody>(entity),
                world.get::<MapPosition>(entity),
            ) else {
                debug!("Skipping non-static collider {:?}: missing components", entity);
                continue;
            };
            mover_index.insert(entity, frame.movers.len());
            frame.movers.push(Mover {
                entity,
                collider: collider.clone(),
                body: body.clone(),
                position: *position,
                original_velocity: body.velocity,
            });
        }

        for &entity in cm.static_colliders() {
            match world.get::<Collider>(entity) {
                Some(collider) => frame.solids.push(Solid {
                    collider: collider.clone(),
                }),
                None => debug!("Skipping static collider {:?}: missing Collider", entity),
            }
        }

        for &entity in cm.rigid_bodies() {
            if let Some(&index) = mover_index.get(&entity) {
                frame.bodies.push(BodySlot::Mover(index));
                continue;
            }
            let (Some(body), Some(position)) = (
                world.get::<RigidBody>(entity),
                world.get::<MapPosition>(entity),
            ) else {
                debug!("Skipping rigid body {:?}: missing components", entity);
                continue;
            };
            frame.bodies.push(BodySlot::Free(frame.free_bodies.len()));
            frame.free_bodies.push(FreeBody {
                entity,
                body: body.clone(),
                position: *position,
            });
        }
        frame
    }

    fn body_mut(&mut self, slot: BodySlot) -> (&mut RigidBody, &mut MapPosition) {
        match slot {
            BodySlot::Mover(i) => {
                let m = &mut self.movers[i];
                (&mut m.body, &mut m.position)
            }
            BodySlot::Free(i) => {
                let f = &mut self.free_bodies[i];
                (&mut f.body, &mut f.position)
            }
        }
    }

    fn run(&mut self, dt: f32) {
        for mover in self.movers.iter_mut().filter(|m| m.collider.enabled) {
            mover.refresh(dt);
        }

        for slot in self.bodies.clone() {
            let (body, _) = self.body_mut(slot);
            if body.enabled {
                body.update_velocity_from_gravity(dt);
            }
        }

        for mover in &mut self.movers {
            mover.refresh(dt);
            mover.original_velocity = mover.body.velocity;
        }

        self.resolve_moving_pairs(dt);
        self.resolve_against_static(dt);

        for slot in self.bodies.clone() {
            let (body, position) = self.body_mut(slot);
            if body.enabled {
                body.update_physics(position, dt);
            }
        }

        for mover in &mut self.movers {
            mover.body.velocity = mover.original_velocity;
        }
    }

    fn resolve_moving_pairs(&mut self, dt: f32) {
        let count = self.movers.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (a, b) = pair_mut(&mut self.movers, i, j);
                if !a.resolves() || !b.resolves() {
                    continue;
                }
                let xi = a.body.velocity.x;
                let xj = b.body.velocity.x;

                // The performer runs the horizontal test against the target.
                let (faster, slower, faster_checks) = if a.body.is_in_air == b.body.is_in_air {
                    if xj.abs() > xi.abs() {
                        (b, a, true)
                    } else {
                        (a, b, true)
                    }
                } else if a.body.is_in_air {
                    // the grounded body checks against the airborne one
                    (a, b, false)
                } else {
                    (b, a, false)
                };
                let faster_x = faster.body.velocity.x;

                let hit = if faster_checks {
                    faster.collider.intersect_horizontally(
                        &mut faster.body,
                        &mut faster.position,
                        &slower.collider,
                    )
                } else {
                    slower.collider.intersect_horizontally(
                        &mut slower.body,
                        &mut slower.position,
                        &faster.collider,
                    )
                };
                if !hit {
                    continue;
                }

                let merged = merged_velocity(xi, xj);
                faster.body.velocity.x = merged;
                slower.body.velocity.x = merged;
                faster.refresh(dt);
                slower.refresh(dt);

                if blocked_horizontally(slower, &self.solids) {
                    slower.refresh(dt);
                    faster.body.velocity.x = 0.0;
                    slower.body.velocity.x = 0.0;
                    faster.original_velocity.x = 0.0;
                    slower.original_velocity.x = 0.0;
                    if bounds_intersect(&faster.collider.bounds, &slower.collider.bounds) {
                        let moving_right = if faster_x != 0.0 {
                            faster_x > 0.0
                        } else {
                            faster.collider.center().x < slower.collider.center().x
                        };
                        faster.collider.snap_horizontally(
                            &mut faster.position,
                            &slower.collider,
                            moving_right,
                        );
                        faster.refresh(dt);
                        slower.refresh(dt);
                    }
                }
            }
        }
    }

    fn resolve_against_static(&mut self, dt: f32) {
        for mover in &mut self.movers {
            for solid in &self.solids {
                if !mover.resolves() || !solid.resolves() {
                    continue;
                }
                let vy_before = mover.body.velocity.y;
                let unsnapped = mover.position;
                let vertical_check = mover.collider.vertical_check_bounds;
                let vertical = mover.collider.intersect_vertically(
                    &mut mover.body,
                    &mut mover.position,
                    &solid.collider,
                );
                if vertical {
                    mover.position.pos.y = settle_vertically(
                        &mover.collider,
                        unsnapped,
                        &vertical_check,
                        &self.solids,
                        vy_before > 0.0,
                        mover.position.pos.y,
                    );
                    // horizontal test runs from the settled position
                    mover.refresh(dt);
                }
                let horizontal = mover.collider.intersect_horizontally(
                    &mut mover.body,
                    &mut mover.position,
                    &solid.collider,
                );

                if vertical {
                    if mover.body.is_in_air && vy_before < 0.0 {
                        mover.body.is_in_air = false;
                        mover.body.on_grounded();
                        self.grounded.push(mover.entity);
                    }
                    mover.body.velocity.y = 0.0;
                    mover.original_velocity.y = 0.0;
                }
                if horizontal {
                    mover.body.velocity.x = 0.0;
                    mover.original_velocity.x = 0.0;
                }
                if vertical || horizontal {
                    mover.refresh(dt);
                }
            }
        }
    }

    fn write_back(self, world: &mut World) -> Vec<Entity> {
        for mover in self.movers {
            if let Ok(mut entity) = world.get_entity_mut(mover.entity) {
                entity.insert((mover.collider, mover.body, mover.position));
            }
        }
        for free in self.free_bodies {
            if let Ok(mut entity) = world.get_entity_mut(free.entity) {
                entity.insert((free.body, free.position));
            }
        }
        self.grounded
    }
}

/// Horizontal velocity both bodies share after a moving-vs-moving contact.
///
/// Same sign: the faster magnitude carries the slower body. Otherwise the
/// velocities add.
pub fn merged_velocity(xi: f32, xj: f32) -> f32 {
    if (xi > 0.0 && xj > 0.0) || (xi < 0.0 && xj < 0.0) {
        xi.signum() * xi.abs().max(xj.abs())
    } else {
        xi + xj
    }
}

/// Vertical snap target over every solid the check bounds touch: the highest
/// support when falling, the lowest ceiling when rising. `first` is the snap
/// against the solid that reported the contact.
fn settle_vertically(
    collider: &Collider,
    unsnapped: MapPosition,
    check: &ColliderBounds,
    solids: &[Solid],
    moving_up: bool,
    first: f32,
) -> f32 {
    solids
        .iter()
        .filter(|s| s.resolves() && bounds_intersect(check, &s.collider.bounds))
        .map(|solid| {
            let mut position = unsnapped;
            collider.snap_vertically(&mut position, &solid.collider, moving_up);
            position.pos.y
        })
        .fold(first, |best, y| if moving_up { best.min(y) } else { best.max(y) })
}

/// First static contact wins; the mover is snapped against it.
fn blocked_horizontally(mover: &mut Mover, solids: &[Solid]) -> bool {
    solids.iter().filter(|s| s.resolves()).any(|solid| {
        mover
            .collider
            .intersect_horizontally(&mut mover.body, &mut mover.position, &solid.collider)
    })
}

fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

/// Exclusive system running one fixed simulation step (`RunSimulationStep`).
pub fn simulation_step(world: &mut World) {
    if let Some(state) = world.get_resource::<GameState>() {
        if !state.is_playing() {
            debug!("simulation_step skipped: game state is {:?}", state.get());
            return;
        }
    }
    let dt = world
        .get_resource::<PhysicsConfig>()
        .map(|c| c.delta_time)
        .unwrap_or_else(|| PhysicsConfig::new().delta_time);

    let mut frame = match world.get_resource::<CollisionManager>() {
        Some(cm) => Frame::gather(world, cm),
        None => Frame::default(),
    };
    frame.run(dt);
    let grounded = frame.write_back(world);

    world
        .get_resource_or_insert_with(WorldTime::default)
        .advance(dt);

    for entity in grounded {
        world.trigger(GroundedEvent { entity });
    }
}
