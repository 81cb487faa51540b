//! Engine systems.
//!
//! Submodules overview
//! - [`gamestate`] – run condition for the playing state
//! - [`particles`] – sync emitter origins, update the particle pass, fill the draw queue
//! - [`time`] – update simulation time and delta
pub mod gamestate;
pub mod particles;
pub mod time;
