//! Camera-facing quad orientation and draw submission.
//!
//! Particles are rendered as textured quads that always face the viewer. The
//! orientation is rebuilt each update from the active camera's front and up
//! vectors, then rolled by the particle's own rotation.

use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

use crate::particles::texture::TextureHandle;

/// View basis of the active camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBasis {
    /// Direction the camera looks at.
    pub front: Vec3,
    /// Camera up vector.
    pub up: Vec3,
}

impl Default for ViewBasis {
    fn default() -> Self {
        Self {
            front: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl ViewBasis {
    pub fn new(front: Vec3, up: Vec3) -> Self {
        Self { front, up }
    }

    /// Orientation of a quad facing this viewer, rolled by `roll` radians
    /// around the quad normal.
    ///
    /// The quad's local +Z points back at the camera (`-front`), +Y follows
    /// the camera up vector and +X completes the right-handed basis.
    pub fn facing(&self, roll: f32) -> Quat {
        let z = -self.front.normalize_or(Vec3::NEG_Z);
        let y = self.up.normalize_or(Vec3::Y);
        let x = y.cross(z).normalize_or(Vec3::X);
        // Re-orthogonalise in case front and up are not perpendicular.
        let y = z.cross(x);
        let basis = Quat::from_mat3(&Mat3::from_cols(x, y, z));
        if roll == 0.0 {
            basis
        } else {
            basis * Quat::from_rotation_z(roll)
        }
    }
}

/// One textured billboard quad ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSubmission {
    /// World transform: uniform scale by size, facing rotation, position.
    pub transform: Mat4,
    pub texture: TextureHandle,
    /// RGBA tint.
    pub color: Vec4,
}

impl DrawSubmission {
    pub fn new(position: Vec3, facing: Quat, size: f32, texture: TextureHandle, color: Vec4) -> Self {
        Self {
            transform: Mat4::from_scale_rotation_translation(Vec3::splat(size), facing, position),
            texture,
            color,
        }
    }
}

/// Sink for billboard draw calls.
///
/// The GPU submission lives outside this crate; implementors receive one call
/// per visible particle.
pub trait BillboardRenderer {
    fn draw_billboard(&mut self, submission: DrawSubmission);
}

impl BillboardRenderer for Vec<DrawSubmission> {
    fn draw_billboard(&mut self, submission: DrawSubmission) {
        self.push(submission);
    }
}
