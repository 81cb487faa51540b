//! ECS components for entities.
//!
//! Submodules overview:
//! - [`emitterattachment`] – links a scene entity to a registered particle emitter
//! - [`worldposition`] – world-space position of a scene node

pub mod emitterattachment;
pub mod worldposition;
