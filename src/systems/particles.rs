//! Particle systems.
//!
//! Glue between the ECS world and the engine-agnostic
//! [`ParticleManager`](crate::particles::manager::ParticleManager).
//!
//! # Frame Flow
//!
//! 1. [`sync_emitter_origins`] copies each attachment entity's
//!    [`WorldPosition`] into its emitter
//! 2. [`particle_update_system`] runs the spawn phase (gated on
//!    [`GameStates::Playing`](crate::resources::gamestate::GameStates)) and
//!    then ages every particle
//! 3. [`particle_draw_system`] refills the [`DrawQueue`] for the renderer
//!
//! Register them chained, in that order; drawing must come after the update
//! of the same frame.

use bevy_ecs::prelude::*;
use log::info;

use crate::components::emitterattachment::EmitterAttachment;
use crate::components::worldposition::WorldPosition;
use crate::particles::emitter::{Emitter, EmitterId};
use crate::particles::manager::FrameContext;
use crate::resources::camera3d::Camera3DRes;
use crate::resources::drawqueue::DrawQueue;
use crate::resources::gamestate::GameState;
use crate::systems::gamestate::state_is_playing;
use crate::resources::particlemanager::ParticleManagerRes;
use crate::resources::texturestore::TextureStore;
use crate::resources::worldtime::WorldTime;

/// Register `emitter` and attach it to `entity`.
///
/// The emitter's texture is resolved against the [`TextureStore`] when one
/// is present, and its origin starts at the entity's [`WorldPosition`].
pub fn attach_emitter(world: &mut World, entity: Entity, mut emitter: Emitter) -> EmitterId {
    if let Some(position) = world.get::<WorldPosition>(entity) {
        emitter.origin = position.pos;
    }
    if let Some(store) = world.get_resource::<TextureStore>() {
        let _ = emitter.resolve_texture(store);
    }
    let id = world.resource_mut::<ParticleManagerRes>().0.register_emitter(emitter);
    world.entity_mut(entity).insert(EmitterAttachment { id });
    info!("Emitter {:?} attached to {:?}", id, entity);
    id
}

/// Copy attachment positions into their emitters.
pub fn sync_emitter_origins(
    query: Query<(&EmitterAttachment, &WorldPosition)>,
    mut manager: ResMut<ParticleManagerRes>,
) {
    for (attachment, position) in query.iter() {
        if let Some(emitter) = manager.0.emitter_mut(attachment.id) {
            emitter.origin = position.pos;
        }
    }
}

/// Advance emitters and particles by the frame delta.
///
/// # Ordering
///
/// Should run **after** [`sync_emitter_origins`] so spawns use this frame's
/// node positions.
pub fn particle_update_system(
    time: Res<WorldTime>,
    state: Res<GameState>,
    camera: Option<Res<Camera3DRes>>,
    mut manager: ResMut<ParticleManagerRes>,
) {
    let dt = time.delta; // delta is already scaled
    if dt <= 0.0 {
        return;
    }
    let ctx = FrameContext {
        running: state_is_playing(state),
        view: camera.map(|c| c.0).unwrap_or_default(),
    };
    manager.0.update(dt, &ctx);
}

/// Rebuild the [`DrawQueue`] from the active particles.
pub fn particle_draw_system(manager: Res<ParticleManagerRes>, mut queue: ResMut<DrawQueue>) {
    queue.clear();
    manager.0.draw(&mut *queue);
}
