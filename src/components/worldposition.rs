use bevy_ecs::prelude::Component;
use glam::Vec3;

/// World-space position of a scene node.
///
/// Emitters attached to the node spawn relative to this point.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct WorldPosition {
    pub pos: Vec3,
}

impl WorldPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        WorldPosition {
            pos: Vec3::new(x, y, z),
        }
    }
}
