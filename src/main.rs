//! Aberred particles demo entry point.
//!
//! Runs a headless particle scene for a fixed number of frames:
//! - **bevy_ecs** world holding the particle manager, clock and camera
//! - a fountain emitter whose particles burst into sparks on death
//! - a drifting smoke emitter attached to a moving node
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --frames 600 --dump-records emitters.json
//! ```

use aberredparticles::components::worldposition::WorldPosition;
use aberredparticles::events::emitter::{DetachEmitterEvent, detach_emitter_observer};
use aberredparticles::particles::emitter::Emitter;
use aberredparticles::resources::camera3d::Camera3DRes;
use aberredparticles::resources::drawqueue::DrawQueue;
use aberredparticles::resources::gamestate::{GameState, GameStates};
use aberredparticles::resources::particleconfig::ParticleConfig;
use aberredparticles::resources::particlemanager::ParticleManagerRes;
use aberredparticles::resources::texturestore::TextureStore;
use aberredparticles::resources::worldtime::WorldTime;
use aberredparticles::systems::particles::{
    attach_emitter, particle_draw_system, particle_update_system, sync_emitter_origins,
};
use aberredparticles::systems::time::update_world_time;
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use clap::Parser;
use glam::{Vec3, Vec4};
use std::path::PathBuf;

/// Aberred particles demo
#[derive(Parser)]
#[command(version, about = "Headless demo of the pooled billboard particle system.")]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./particles.ini")]
    config: PathBuf,

    /// Number of frames to simulate (overrides the config file).
    #[arg(long)]
    frames: Option<u32>,

    /// Fixed frame delta in seconds (overrides the config file).
    #[arg(long)]
    delta: Option<f32>,

    /// Write the emitter records as JSON to this path before exiting.
    #[arg(long, value_name = "PATH")]
    dump_records: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = ParticleConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        log::info!("{}, using defaults", e);
    }
    let frames = cli.frames.unwrap_or(config.frames);
    let delta = cli.delta.unwrap_or(config.delta);

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(1.0));
    world.insert_resource(ParticleManagerRes::new(config.pool_capacity, config.seed));
    world.insert_resource(Camera3DRes::looking_at(
        Vec3::new(0.0, 2.0, 10.0),
        Vec3::ZERO,
        Vec3::Y,
    ));
    world.insert_resource(DrawQueue::default());
    let mut textures = TextureStore::new();
    textures.insert("fountain.png");
    textures.insert("spark.png");
    textures.insert("smoke.png");
    world.insert_resource(textures);
    let mut state = GameState::new();
    state.set(GameStates::Playing);
    world.insert_resource(state);
    world.insert_resource(config);

    world.spawn(Observer::new(detach_emitter_observer));
    world.flush();

    // --------------- Scene ---------------
    let fountain = world.spawn(WorldPosition::new(0.0, 0.0, 0.0)).id();
    let fountain_id = attach_emitter(
        &mut world,
        fountain,
        Emitter::new()
            .with_spawn_interval(0.05)
            .with_life(1.2)
            .with_speed(4.0)
            .with_direction(Vec3::Y)
            .with_size(0.3)
            .with_color(Vec4::new(0.4, 0.6, 1.0, 1.0))
            .with_texture_path("fountain.png"),
    );
    let sparks = world.spawn(WorldPosition::default()).id();
    let sparks_id = attach_emitter(
        &mut world,
        sparks,
        Emitter::new()
            .with_life(0.4)
            .with_speed(1.5)
            .with_direction(Vec3::new(0.3, 1.0, 0.0))
            .with_rotation_range(0.0, 360.0)
            .with_size(0.1)
            .with_color(Vec4::new(1.0, 0.9, 0.3, 1.0))
            .with_texture_path("spark.png"),
    );
    if let Err(e) = world
        .resource_mut::<ParticleManagerRes>()
        .0
        .set_sub_emitter(fountain_id, Some(sparks_id), 6)
    {
        log::error!("Could not link sparks to the fountain: {}", e);
    }
    let smoke = world.spawn(WorldPosition::new(-3.0, 0.0, 0.0)).id();
    attach_emitter(
        &mut world,
        smoke,
        Emitter::new()
            .with_spawn_interval(0.2)
            .with_life(3.0)
            .with_speed(0.5)
            .with_direction(Vec3::new(0.1, 1.0, 0.0))
            .with_rotation_range(-30.0, 30.0)
            .with_size(1.0)
            .with_color(Vec4::new(0.5, 0.5, 0.5, 0.6))
            .with_texture_path("smoke.png"),
    );

    let mut update = Schedule::default();
    update.add_systems((sync_emitter_origins, particle_update_system, particle_draw_system).chain());

    // --------------- Main loop ---------------
    let frames_per_report = ((1.0 / delta).round() as u64).max(1);
    for _ in 0..frames {
        update_world_time(&mut world, delta);

        // Drift the smoke node along X.
        if let Some(mut pos) = world.get_mut::<WorldPosition>(smoke) {
            pos.pos.x += delta * 0.5;
        }

        update.run(&mut world);

        if world.resource::<WorldTime>().frame_count % frames_per_report == 0 {
            let manager = &world.resource::<ParticleManagerRes>().0;
            let stats = manager.stats();
            log::info!(
                "t={:.2}s active={} drawn={} spawned={} burst={} released={} skipped={}",
                world.resource::<WorldTime>().elapsed,
                manager.active_particles(),
                world.resource::<DrawQueue>().len(),
                stats.spawned,
                stats.burst_spawned,
                stats.released,
                stats.skipped_spawns
            );
        }
    }

    if let Some(path) = cli.dump_records {
        let records = world.resource::<ParticleManagerRes>().0.save_emitters();
        match serde_json::to_string_pretty(&records) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => log::info!("Emitter records written to {}", path.display()),
                Err(e) => log::error!("Failed to write {}: {}", path.display(), e),
            },
            Err(e) => log::error!("Failed to serialize emitter records: {}", e),
        }
    }

    world.trigger(DetachEmitterEvent { entity: smoke });
    world.flush();
    log::info!(
        "Finished: {} emitters, {} active particles",
        world.resource::<ParticleManagerRes>().0.emitter_count(),
        world.resource::<ParticleManagerRes>().0.active_particles()
    );
}
