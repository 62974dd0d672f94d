//! Headless demo for the kinematic 2D collision library.
//!
//! Loads an optional physics config and scene, runs a fixed number of
//! simulation steps and logs where every body ended up.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --config assets/physics.ini --scene assets/scenes/demo.json --ticks 240
//! cargo run --release -- --random-bodies 32 --seed 7
//! ```

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};
use std::path::PathBuf;

use kinematic2d::components::mapposition::MapPosition;
use kinematic2d::components::rigidbody::RigidBody;
use kinematic2d::events::grounded::GroundedEvent;
use kinematic2d::resources::collisionmanager::CollisionManager;
use kinematic2d::resources::gamestate::{GameState, GameStates};
use kinematic2d::resources::physicsconfig::PhysicsConfig;
use kinematic2d::resources::worldtime::WorldTime;
use kinematic2d::scene::{SceneBody, SceneData, SceneShape, SceneStatic, spawn_scene};
use kinematic2d::systems::gamestate::state_is_playing;
use kinematic2d::systems::simulation::simulation_step;

/// Kinematic 2D collision demo
#[derive(Parser)]
#[command(version, about = "Runs a headless kinematic collision scene and reports final positions.")]
struct Cli {
    /// INI file with physics settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// JSON scene file. A small built-in scene is used when omitted.
    #[arg(long, value_name = "PATH")]
    scene: Option<String>,

    /// Number of fixed steps to simulate.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Add this many randomly placed falling bodies.
    #[arg(long, default_value_t = 0)]
    random_bodies: usize,

    /// Seed for the random bodies; runs with the same seed are identical.
    #[arg(long)]
    seed: Option<u64>,
}

fn builtin_scene() -> SceneData {
    SceneData {
        statics: vec![
            SceneStatic {
                position: Vec2::new(0.0, 0.0),
                shape: SceneShape::Box {
                    size: Vec2::new(40.0, 1.0),
                    offset: Vec2::ZERO,
                    horizontal_buffer: None,
                    vertical_buffer: None,
                },
                trigger: false,
            },
            SceneStatic {
                position: Vec2::new(-15.0, 3.0),
                shape: SceneShape::Box {
                    size: Vec2::new(1.0, 6.0),
                    offset: Vec2::ZERO,
                    horizontal_buffer: None,
                    vertical_buffer: None,
                },
                trigger: false,
            },
        ],
        bodies: vec![
            SceneBody {
                name: Some("left".into()),
                position: Vec2::new(-6.0, 1.5),
                velocity: Vec2::new(5.0, 0.0),
                shape: Some(SceneShape::Capsule {
                    size: 1.0,
                    radius: 0.5,
                    offset: Vec2::ZERO,
                    buffer: None,
                }),
                trigger: false,
                use_gravity: true,
                gravity: None,
                max_fall_speed: None,
            },
            SceneBody {
                name: Some("right".into()),
                position: Vec2::new(6.0, 4.0),
                velocity: Vec2::new(-3.0, 0.0),
                shape: Some(SceneShape::Box {
                    size: Vec2::ONE,
                    offset: Vec2::ZERO,
                    horizontal_buffer: None,
                    vertical_buffer: None,
                }),
                trigger: false,
                use_gravity: true,
                gravity: None,
                max_fall_speed: None,
            },
        ],
    }
}

fn random_bodies(rng: &mut fastrand::Rng, count: usize) -> Vec<SceneBody> {
    (0..count)
        .map(|i| {
            let shape = if rng.bool() {
                SceneShape::Circle {
                    radius: 0.25 + rng.f32() * 0.5,
                    offset: Vec2::ZERO,
                    radius_buffer: None,
                }
            } else {
                let side = 0.5 + rng.f32();
                SceneShape::Box {
                    size: Vec2::splat(side),
                    offset: Vec2::ZERO,
                    horizontal_buffer: None,
                    vertical_buffer: None,
                }
            };
            SceneBody {
                name: Some(format!("random_{}", i)),
                position: Vec2::new(rng.f32() * 28.0 - 14.0, 2.0 + rng.f32() * 20.0),
                velocity: Vec2::new(rng.f32() * 8.0 - 4.0, 0.0),
                shape: Some(shape),
                trigger: false,
                use_gravity: true,
                gravity: None,
                max_fall_speed: None,
            }
        })
        .collect()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PhysicsConfig::with_path(path),
        None => PhysicsConfig::new(),
    };
    if cli.config.is_some() {
        if let Err(e) = config.load_from_file() {
            warn!("{}; using default physics settings", e);
        }
    }

    let mut scene = match &cli.scene {
        Some(path) => match SceneData::load_from_file(path) {
            Ok(scene) => scene,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => builtin_scene(),
    };
    if cli.random_bodies > 0 {
        let mut rng = match cli.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        scene.bodies.extend(random_bodies(&mut rng, cli.random_bodies));
    }

    let mut world = World::new();
    world.insert_resource(config);
    world.insert_resource(WorldTime::default());
    world.insert_resource(CollisionManager::new());
    let mut state = GameState::new();
    state.set(GameStates::Setup);
    world.insert_resource(state);

    let spawned = match spawn_scene(&mut world, &scene) {
        Ok(spawned) => spawned,
        Err(e) => {
            error!("Failed to spawn scene: {}", e);
            std::process::exit(1);
        }
    };

    world.add_observer(|trigger: On<GroundedEvent>, time: Res<WorldTime>| {
        info!(
            "{:?} landed at frame {}",
            trigger.event().entity,
            time.frame_count
        );
    });

    let mut update = Schedule::default();
    update.add_systems(simulation_step.run_if(state_is_playing));

    world.resource_mut::<GameState>().set(GameStates::Playing);
    for _ in 0..cli.ticks {
        update.run(&mut world);
    }
    world.resource_mut::<GameState>().set(GameStates::Quitting);

    let time = *world.resource::<WorldTime>();
    info!(
        "Simulated {} steps ({:.3}s)",
        time.frame_count, time.elapsed
    );
    for (name, entity) in &spawned.bodies {
        let (Some(position), Some(body)) = (
            world.get::<MapPosition>(*entity),
            world.get::<RigidBody>(*entity),
        ) else {
            continue;
        };
        info!(
            "{}: position=({:.3}, {:.3}) velocity=({:.3}, {:.3}) in_air={}",
            name.as_deref().unwrap_or("body"),
            position.pos.x,
            position.pos.y,
            body.velocity.x,
            body.velocity.y,
            body.is_in_air
        );
    }
}
