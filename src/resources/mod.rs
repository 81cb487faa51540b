//! ECS resources made available to systems.
//!
//! Overview
//! - `camera3d` – active camera basis used to orient billboards
//! - `drawqueue` – billboard draw calls produced each frame
//! - `gamestate` – simulation mode (editing, playing, paused)
//! - `particleconfig` – pool capacity and demo settings from an INI file
//! - `particlemanager` – the particle pool and emitter registry
//! - `texturestore` – texture handles keyed by path
//! - `worldtime` – simulation time and delta
pub mod camera3d;
pub mod drawqueue;
pub mod gamestate;
pub mod particleconfig;
pub mod particlemanager;
pub mod texturestore;
pub mod worldtime;
