//! Physics configuration resource.
//!
//! Tunables for the simulation step loaded from an INI file. Defaults are
//! safe for startup; missing keys keep their current values.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! delta_time = 0.016666668
//!
//! [gravity]
//! gravity = -30
//! max_fall_speed = 20
//!
//! [collider]
//! horizontal_buffer = 0.02
//! vertical_buffer = 0.02
//! radius_buffer = 0.01
//! capsule_buffer = 0.02
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::PhysicsError;

const DEFAULT_DELTA_TIME: f32 = 1.0 / 60.0;
const DEFAULT_GRAVITY: f32 = -30.0;
const DEFAULT_MAX_FALL_SPEED: f32 = 20.0;
const DEFAULT_BOX_BUFFER: f32 = crate::components::boxcollider::DEFAULT_BOX_BUFFER;
const DEFAULT_RADIUS_BUFFER: f32 = crate::components::circlecollider::DEFAULT_RADIUS_BUFFER;
const DEFAULT_CAPSULE_BUFFER: f32 = crate::components::capsulecollider::DEFAULT_CAPSULE_BUFFER;
const DEFAULT_CONFIG_PATH: &str = "./physics.ini";

/// Simulation tunables.
///
/// `delta_time` is the fixed step used both by the check bounds and by the
/// integration hooks. The gravity and buffer values are the defaults handed
/// to bodies and colliders spawned from scenes; the step itself never reads
/// them.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PhysicsConfig {
    /// Fixed step length in seconds.
    pub delta_time: f32,
    /// Vertical gravity acceleration (negative is down).
    pub gravity: f32,
    /// Terminal fall speed; zero or negative disables the clamp.
    pub max_fall_speed: f32,
    pub horizontal_buffer: f32,
    pub vertical_buffer: f32,
    pub radius_buffer: f32,
    pub capsule_buffer: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsConfig {
    pub fn new() -> Self {
        Self {
            delta_time: DEFAULT_DELTA_TIME,
            gravity: DEFAULT_GRAVITY,
            max_fall_speed: DEFAULT_MAX_FALL_SPEED,
            horizontal_buffer: DEFAULT_BOX_BUFFER,
            vertical_buffer: DEFAULT_BOX_BUFFER,
            radius_buffer: DEFAULT_RADIUS_BUFFER,
            capsule_buffer: DEFAULT_CAPSULE_BUFFER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Terminal fall speed as used by [`crate::components::rigidbody::RigidBody`].
    pub fn fall_speed_limit(&self) -> Option<f32> {
        (self.max_fall_speed > 0.0).then_some(self.max_fall_speed)
    }

    /// Load configuration from the INI file.
    ///
    /// Returns an error if the file cannot be read, a value does not parse,
    /// or `delta_time` is not positive.
    pub fn load_from_file(&mut self) -> Result<(), PhysicsError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| PhysicsError::Config(format!("Failed to load config file: {}", e)))?;
        self.apply(&config)?;

        info!(
            "Loaded physics config: dt={}, gravity={}, max_fall_speed={}, buffers=({}, {}, {}, {})",
            self.delta_time,
            self.gravity,
            self.max_fall_speed,
            self.horizontal_buffer,
            self.vertical_buffer,
            self.radius_buffer,
            self.capsule_buffer
        );
        Ok(())
    }

    /// Parse configuration from an INI string. Used by tests and embedders
    /// that keep their settings elsewhere.
    pub fn load_from_str(&mut self, contents: &str) -> Result<(), PhysicsError> {
        let mut config = Ini::new();
        config
            .read(contents.to_string())
            .map_err(|e| PhysicsError::Config(format!("Failed to parse config: {}", e)))?;
        self.apply(&config)
    }

    fn apply(&mut self, config: &Ini) -> Result<(), PhysicsError> {
        let read = |section: &str, key: &str| -> Result<Option<f32>, PhysicsError> {
            config
                .getfloat(section, key)
                .map(|v| v.map(|v| v as f32))
                .map_err(|e| PhysicsError::Config(format!("[{}] {}: {}", section, key, e)))
        };

        // [simulation] section
        if let Some(dt) = read("simulation", "delta_time")? {
            if dt <= 0.0 {
                return Err(PhysicsError::Config(format!(
                    "[simulation] delta_time must be positive, got {}",
                    dt
                )));
            }
            self.delta_time = dt;
        }

        // [gravity] section
        if let Some(gravity) = read("gravity", "gravity")? {
            self.gravity = gravity;
        }
        if let Some(max_fall) = read("gravity", "max_fall_speed")? {
            self.max_fall_speed = max_fall;
        }

        // [collider] section
        if let Some(v) = read("collider", "horizontal_buffer")? {
            self.horizontal_buffer = v;
        }
        if let Some(v) = read("collider", "vertical_buffer")? {
            self.vertical_buffer = v;
        }
        if let Some(v) = read("collider", "radius_buffer")? {
            self.radius_buffer = v;
        }
        if let Some(v) = read("collider", "capsule_buffer")? {
            self.capsule_buffer = v;
        }
        Ok(())
    }

    /// Save configuration to the INI file.
    pub fn save_to_file(&self) -> Result<(), PhysicsError> {
        let mut config = Ini::new();

        config.set("simulation", "delta_time", Some(self.delta_time.to_string()));

        config.set("gravity", "gravity", Some(self.gravity.to_string()));
        config.set("gravity", "max_fall_speed", Some(self.max_fall_speed.to_string()));

        config.set("collider", "horizontal_buffer", Some(self.horizontal_buffer.to_string()));
        config.set("collider", "vertical_buffer", Some(self.vertical_buffer.to_string()));
        config.set("collider", "radius_buffer", Some(self.radius_buffer.to_string()));
        config.set("collider", "capsule_buffer", Some(self.capsule_buffer.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| PhysicsError::Config(format!("Failed to save config file: {}", e)))?;

        info!("Saved physics config to {:?}", self.config_path);
        Ok(())
    }
}
