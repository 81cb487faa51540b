//! Active camera resource.
//!
//! Camera control lives outside the particle subsystem; it only reads the
//! camera's view basis every frame to orient billboards.

use bevy_ecs::prelude::Resource;
use glam::Vec3;

use crate::particles::billboard::ViewBasis;

/// ECS resource that holds the active camera's front and up vectors.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Camera3DRes(pub ViewBasis);

impl Camera3DRes {
    /// Camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Camera3DRes(ViewBasis::new((target - eye).normalize_or(Vec3::NEG_Z), up))
    }
}
