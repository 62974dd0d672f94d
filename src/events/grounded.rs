//! Landing notification.
//!
//! The simulation step triggers one [`GroundedEvent`] per landing detected
//! in a tick, after every component has been written back, in registry
//! order. Observers see the landed body at its snapped position with a zero
//! vertical velocity.
use bevy_ecs::prelude::*;

/// Fired when an airborne, descending body lands on a static collider.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroundedEvent {
    pub entity: Entity,
}
