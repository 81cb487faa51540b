//! Pooled particle simulation core.
//!
//! This module has no ECS dependencies. It can be driven directly by
//! constructing a [`manager::ParticleManager`], registering emitters and
//! calling `update` / `draw` once per frame; the engine-facing glue lives in
//! [`crate::systems::particles`].
//!
//! - [`billboard`] – camera-facing orientation and draw submissions
//! - [`emitter`] – spawn scheduler and particle template
//! - [`error`] – error type shared by the core
//! - [`manager`] – pool + emitter registry + per-frame pass
//! - [`particle`] – particle record and its lifecycle
//! - [`pool`] – fixed-capacity slot storage
//! - [`record`] – persisted emitter configuration
//! - [`texture`] – opaque texture handles

pub mod billboard;
pub mod emitter;
pub mod error;
pub mod manager;
pub mod particle;
pub mod pool;
pub mod record;
pub mod texture;
