//! Kinematic body component with ordered named acceleration forces.
//!
//! The [`RigidBody`] component stores velocity, the grounded/airborne flag and
//! a list of named acceleration forces (gravity is the force named
//! [`GRAVITY_FORCE`]). Each force can be individually enabled/disabled.
//!
//! The collision pipeline never owns gravity constants or integration
//! formulas. It calls the body's [`BodyHooks`] once per tick:
//! - `gravity` – `update_velocity_from_gravity`, before resolution
//! - `integrate` – `update_physics`, after resolution
//! - `grounded` – optional, when a landing on a static collider is detected
//!
//! Forces are kept in insertion order so the summed acceleration is
//! bit-identical across runs given identical inputs.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::mapposition::MapPosition;

pub const GRAVITY_FORCE: &str = "gravity";

/// A named acceleration force that can be toggled on/off.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccelerationForce {
    /// The acceleration vector in world units per second squared.
    pub value: Vec2,
    /// Whether this force is currently active.
    pub enabled: bool,
}

impl AccelerationForce {
    /// Create a new acceleration force with specified enabled state.
    pub fn with_enabled(value: Vec2, enabled: bool) -> Self {
        Self { value, enabled }
    }
}

pub type GravityHook = fn(body: &mut RigidBody, dt: f32);
pub type IntegrateHook = fn(body: &mut RigidBody, position: &mut MapPosition, dt: f32);
pub type GroundedHook = fn(body: &mut RigidBody);

/// Per-body integration callbacks invoked by the simulation step.
#[derive(Clone, Copy, Debug)]
pub struct BodyHooks {
    pub gravity: GravityHook,
    pub integrate: IntegrateHook,
    pub grounded: Option<GroundedHook>,
}

impl Default for BodyHooks {
    fn default() -> Self {
        Self {
            gravity: standard_gravity,
            integrate: standard_integrate,
            grounded: None,
        }
    }
}

/// Adds the enabled forces to the velocity when the body uses gravity, then
/// clamps the fall speed.
pub fn standard_gravity(body: &mut RigidBody, dt: f32) {
    if !body.use_gravity {
        return;
    }
    body.velocity += body.total_acceleration() * dt;
    if let Some(max_fall) = body.max_fall_speed {
        body.velocity.y = body.velocity.y.max(-max_fall);
    }
}

/// Explicit Euler step. A gravity-using body whose vertical velocity survived
/// resolution is not supported by anything and becomes airborne.
pub fn standard_integrate(body: &mut RigidBody, position: &mut MapPosition, dt: f32) {
    position.pos += body.velocity * dt;
    if body.use_gravity && body.velocity.y != 0.0 {
        body.is_in_air = true;
    }
}

/// Kinematic body storing velocity, airborne state and acceleration forces.
///
/// # Example
/// ```ignore
/// let mut rb = RigidBody::with_gravity(-30.0);
/// rb.add_force("wind", Vec2::new(2.0, 0.0));
/// rb.set_force_enabled("wind", false);
/// ```
#[derive(Component, Clone, Debug)]
pub struct RigidBody {
    /// Current velocity in world units per second.
    pub velocity: Vec2,
    /// Named acceleration forces, summed in insertion order.
    pub forces: SmallVec<[(String, AccelerationForce); 2]>,
    /// Cleared when the body lands on a static collider.
    pub is_in_air: bool,
    /// When false the gravity hook leaves the velocity untouched.
    pub use_gravity: bool,
    /// Disabled bodies skip the gravity and integration hooks.
    pub enabled: bool,
    /// Optional terminal fall speed (positive value).
    pub max_fall_speed: Option<f32>,
    pub hooks: BodyHooks,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Create a grounded RigidBody with zero velocity, no forces and gravity off.
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            forces: SmallVec::new(),
            is_in_air: false,
            use_gravity: false,
            enabled: true,
            max_fall_speed: None,
            hooks: BodyHooks::default(),
        }
    }

    /// Create an airborne RigidBody with a vertical gravity force.
    pub fn with_gravity(gravity: f32) -> Self {
        let mut rb = Self::new();
        rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, gravity));
        rb.use_gravity = true;
        rb.is_in_air = true;
        rb
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_max_fall_speed(mut self, max_fall_speed: f32) -> Self {
        self.max_fall_speed = Some(max_fall_speed);
        self
    }

    pub fn with_hooks(mut self, hooks: BodyHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Add or update a named acceleration force (enabled by default).
    pub fn add_force(&mut self, name: &str, value: Vec2) {
        self.add_force_with_state(name, value, true);
    }

    /// Add or update a named acceleration force with specified enabled state.
    /// An existing force keeps its position in the summation order.
    pub fn add_force_with_state(&mut self, name: &str, value: Vec2, enabled: bool) {
        let force = AccelerationForce::with_enabled(value, enabled);
        match self.forces.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = force,
            None => self.forces.push((name.to_string(), force)),
        }
    }

    /// Enable or disable a specific force by name.
    /// Returns false if the force doesn't exist.
    pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(force) = self.force_mut(name) {
            force.enabled = enabled;
            true
        } else {
            false
        }
    }

    pub fn get_force(&self, name: &str) -> Option<&AccelerationForce> {
        self.forces.iter().find(|(n, _)| n == name).map(|(_, f)| f)
    }

    fn force_mut(&mut self, name: &str) -> Option<&mut AccelerationForce> {
        self.forces
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Calculate the total acceleration from all enabled forces.
    pub fn total_acceleration(&self) -> Vec2 {
        let mut total = Vec2::ZERO;
        for (_, force) in &self.forces {
            if force.enabled {
                total += force.value;
            }
        }
        total
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Gravity integration hook (`UpdateVelocityFromGravity`).
    pub fn update_velocity_from_gravity(&mut self, dt: f32) {
        (self.hooks.gravity)(self, dt);
    }

    /// Final integration hook (`UpdatePhysics`).
    pub fn update_physics(&mut self, position: &mut MapPosition, dt: f32) {
        (self.hooks.integrate)(self, position, dt);
    }

    /// Landing notification; `is_in_air` has already been cleared.
    pub fn on_grounded(&mut self) {
        if let Some(hook) = self.hooks.grounded {
            hook(self);
        }
    }
}
