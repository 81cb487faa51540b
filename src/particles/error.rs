//! Error type for the particle core.
//!
//! None of these conditions is fatal. Spawning code treats
//! [`ParticleError::PoolExhausted`] as "skip this spawn", a missing texture
//! only means the particle is not drawn, and sub-emitter cycles are rejected
//! when the link is configured so they never reach the update pass.

use thiserror::Error;

use crate::particles::emitter::EmitterId;

/// Errors produced by the particle pool, emitters and the manager.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ParticleError {
    /// Every slot in the shared pool is active.
    #[error("particle pool exhausted")]
    PoolExhausted,
    /// Linking `parent -> child` would make an emitter burst into its own ancestry.
    #[error("sub-emitter {child:?} is an ancestor of emitter {parent:?}")]
    InvalidSubEmitterCycle { parent: EmitterId, child: EmitterId },
    /// The texture path could not be resolved to a handle.
    #[error("texture '{path}' could not be resolved")]
    MissingTexture { path: String },
    /// The id does not refer to a registered emitter.
    #[error("emitter {0:?} is not registered")]
    UnknownEmitter(EmitterId),
    /// Two records in one load batch share a UUID, so links between them are ambiguous.
    #[error("duplicate emitter uuid {0} in record batch")]
    DuplicateUuid(u32),
    /// A persisted record carries a component type tag other than the emitter's.
    #[error("record has component type {found}, expected an emitter")]
    WrongComponentType { found: i32 },
    /// The persisted record could not be (de)serialized.
    #[error("invalid emitter record: {0}")]
    Record(#[from] serde_json::Error),
}
