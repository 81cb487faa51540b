//! Event and observer to tear down an emitter attached to a scene node.
//!
//! Triggering a [`DetachEmitterEvent`] deregisters the entity's emitter from
//! the [`ParticleManagerRes`], releasing every particle it still owns, and
//! removes the [`EmitterAttachment`] component. The entity itself is left
//! alone.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::{info, warn};

use crate::components::emitterattachment::EmitterAttachment;
use crate::resources::particlemanager::ParticleManagerRes;

/// Request to destroy the emitter attached to `entity`.
#[derive(Event, Debug, Clone, Copy)]
pub struct DetachEmitterEvent {
    pub entity: Entity,
}

/// Observer that deregisters the emitter named by a [`DetachEmitterEvent`].
pub fn detach_emitter_observer(
    trigger: On<DetachEmitterEvent>,
    mut commands: Commands,
    attachments: Query<&EmitterAttachment>,
    mut manager: ResMut<ParticleManagerRes>,
) {
    let entity = trigger.event().entity;
    let Ok(attachment) = attachments.get(entity) else {
        warn!("DetachEmitterEvent: {:?} has no emitter attached", entity);
        return;
    };

    match manager.0.deregister_emitter(attachment.id) {
        Ok(_) => info!("Emitter {:?} detached from {:?}", attachment.id, entity),
        Err(e) => warn!("DetachEmitterEvent on {:?}: {}", entity, e),
    }
    commands.entity(entity).remove::<EmitterAttachment>();
}
