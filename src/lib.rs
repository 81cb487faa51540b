//! Aberred particles library.
//!
//! A pooled billboard particle subsystem: a fixed-capacity particle pool
//! shared by every emitter, per-emitter spawn scheduling, and particle
//! lifecycles with sub-emitter bursts on death. The [`particles`] module is
//! engine-agnostic; the ECS components, resources, systems and events wire it
//! into a `bevy_ecs` world.

pub mod components;
pub mod events;
pub mod particles;
pub mod resources;
pub mod systems;
