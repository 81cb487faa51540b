//! Event types and observers used by the particle subsystem.
//!
//! Submodules:
//! - [`emitter`] – detach (destroy) an emitter attached to a scene node
pub mod emitter;
