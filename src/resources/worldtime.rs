use bevy_ecs::prelude::Resource;

/// Simulated time, advanced only by the simulation step.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    /// Number of simulation steps executed.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Record one executed step of `delta` seconds.
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta * self.time_scale;
        self.elapsed += self.delta;
        self.frame_count += 1;
    }
}
