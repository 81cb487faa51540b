//! Engine tick integration tests for the particle systems.

use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::{Vec3, Vec4};

use aberredparticles::components::emitterattachment::EmitterAttachment;
use aberredparticles::components::worldposition::WorldPosition;
use aberredparticles::events::emitter::{DetachEmitterEvent, detach_emitter_observer};
use aberredparticles::particles::emitter::Emitter;
use aberredparticles::particles::texture::TextureHandle;
use aberredparticles::resources::camera3d::Camera3DRes;
use aberredparticles::resources::drawqueue::DrawQueue;
use aberredparticles::resources::gamestate::{GameState, GameStates};
use aberredparticles::resources::particlemanager::ParticleManagerRes;
use aberredparticles::resources::texturestore::TextureStore;
use aberredparticles::resources::worldtime::WorldTime;
use aberredparticles::systems::particles::{
    attach_emitter, particle_draw_system, particle_update_system, sync_emitter_origins,
};
use aberredparticles::systems::time::update_world_time;

const EPSILON: f32 = 1e-5;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(state: GameStates) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(ParticleManagerRes::new(32, Some(1)));
    world.insert_resource(DrawQueue::default());
    world.insert_resource(Camera3DRes::default());
    let mut textures = TextureStore::new();
    textures.insert("spark.png");
    world.insert_resource(textures);
    let mut game_state = GameState::new();
    game_state.set(state);
    world.insert_resource(game_state);
    world
}

fn tick(world: &mut World, dt: f32) {
    update_world_time(world, dt);
    let mut schedule = Schedule::default();
    schedule.add_systems((sync_emitter_origins, particle_update_system, particle_draw_system).chain());
    schedule.run(world);
}

fn spark_emitter() -> Emitter {
    Emitter::default()
        .with_spawn_interval(0.5)
        .with_life(2.0)
        .with_speed(0.0)
        .with_color(Vec4::new(1.0, 0.0, 0.0, 1.0))
        .with_offset(Vec3::new(0.0, 1.0, 0.0))
        .with_texture_path("spark.png")
}

#[test]
fn attach_emitter_registers_and_tags_entity() {
    let mut world = make_world(GameStates::Playing);
    let node = world.spawn(WorldPosition::new(1.0, 2.0, 3.0)).id();

    let id = attach_emitter(&mut world, node, spark_emitter());

    assert_eq!(world.get::<EmitterAttachment>(node).unwrap().id, id);
    let manager = &world.resource::<ParticleManagerRes>().0;
    let emitter = manager.emitter(id).unwrap();
    assert_eq!(emitter.origin, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(emitter.texture, Some(TextureHandle(0)));
}

#[test]
fn playing_state_spawns_at_node_position() {
    let mut world = make_world(GameStates::Playing);
    let node = world.spawn(WorldPosition::new(0.0, 0.0, 0.0)).id();
    let id = attach_emitter(&mut world, node, spark_emitter());

    world.get_mut::<WorldPosition>(node).unwrap().pos = Vec3::new(5.0, 0.0, 0.0);
    tick(&mut world, 0.5);

    let manager = &world.resource::<ParticleManagerRes>().0;
    assert_eq!(manager.active_particles(), 1);
    let index = manager.emitter(id).unwrap().tracked()[0];
    let p = manager.pool().get(index).unwrap();
    assert_eq!(p.position, Vec3::new(5.0, 1.0, 0.0));
}

#[test]
fn editing_state_does_not_spawn() {
    let mut world = make_world(GameStates::Editing);
    let node = world.spawn(WorldPosition::default()).id();
    attach_emitter(&mut world, node, spark_emitter());

    for _ in 0..4 {
        tick(&mut world, 0.5);
    }

    assert_eq!(world.resource::<ParticleManagerRes>().0.active_particles(), 0);
    assert!(world.resource::<DrawQueue>().is_empty());
}

#[test]
fn draw_queue_is_rebuilt_each_frame() {
    let mut world = make_world(GameStates::Playing);
    let node = world.spawn(WorldPosition::default()).id();
    attach_emitter(&mut world, node, spark_emitter());

    tick(&mut world, 0.5);
    assert_eq!(world.resource::<DrawQueue>().len(), 1);
    tick(&mut world, 0.5);
    assert_eq!(world.resource::<DrawQueue>().len(), 2);

    let queue = world.resource::<DrawQueue>();
    for submission in &queue.submissions {
        assert_eq!(submission.texture, TextureHandle(0));
        assert!(approx_eq(submission.color.x, 1.0));
        assert!(approx_eq(submission.color.y, 0.0));
    }
}

#[test]
fn zero_delta_frame_changes_nothing() {
    let mut world = make_world(GameStates::Playing);
    let node = world.spawn(WorldPosition::default()).id();
    let id = attach_emitter(&mut world, node, spark_emitter());

    tick(&mut world, 0.0);

    let manager = &world.resource::<ParticleManagerRes>().0;
    assert_eq!(manager.active_particles(), 0);
    assert!(approx_eq(manager.emitter(id).unwrap().timer, 0.0));
}

#[test]
fn detach_event_deregisters_and_releases() {
    let mut world = make_world(GameStates::Playing);
    world.spawn(Observer::new(detach_emitter_observer));
    world.flush();

    let node = world.spawn(WorldPosition::default()).id();
    let id = attach_emitter(&mut world, node, spark_emitter());
    tick(&mut world, 0.5);
    tick(&mut world, 0.5);
    assert_eq!(world.resource::<ParticleManagerRes>().0.active_particles(), 2);

    world.trigger(DetachEmitterEvent { entity: node });
    world.flush();

    let manager = &world.resource::<ParticleManagerRes>().0;
    assert!(manager.emitter(id).is_none());
    assert_eq!(manager.active_particles(), 0);
    assert!(world.get::<EmitterAttachment>(node).is_none());
    assert!(world.get_entity(node).is_ok());

    tick(&mut world, 0.5);
    assert!(world.resource::<DrawQueue>().is_empty());
}

#[test]
fn world_time_scales_delta() {
    let mut world = World::new();
    world.insert_resource(WorldTime::default().with_time_scale(0.5));
    update_world_time(&mut world, 0.2);
    let time = world.resource::<WorldTime>();
    assert!(approx_eq(time.delta, 0.1));
    assert!(approx_eq(time.elapsed, 0.1));
    assert_eq!(time.frame_count, 1);
}
