//! Link between a scene entity and a registered particle emitter.
//!
//! The emitter itself lives in the
//! [`ParticleManagerRes`](crate::resources::particlemanager::ParticleManagerRes)
//! registry; the entity only carries its id. Use
//! [`attach_emitter`](crate::systems::particles::attach_emitter) to create
//! both at once and trigger
//! [`DetachEmitterEvent`](crate::events::emitter::DetachEmitterEvent) to
//! remove them.
//!
//! # Related
//!
//! - [`crate::systems::particles::sync_emitter_origins`] – copies the entity's
//!   [`WorldPosition`](crate::components::worldposition::WorldPosition) into
//!   the emitter every frame

use bevy_ecs::prelude::*;

use crate::particles::emitter::EmitterId;

/// Marks an entity as the attachment point of an emitter.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterAttachment {
    pub id: EmitterId,
}
