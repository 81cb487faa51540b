//! A single pooled particle and its lifecycle.
//!
//! A [`Particle`] is a plain record living in a
//! [`ParticlePool`](crate::particles::pool::ParticlePool) slot. It never owns
//! its emitter or texture; the owner is an [`EmitterId`] and the texture an
//! opaque [`TextureHandle`].
//!
//! # Lifecycle
//!
//! ```text
//! Inactive --spawn--> Alive --(life_time >= life)--> Dying --release--> Inactive
//! ```
//!
//! [`Particle::advance`] checks the life budget *before* integrating, so the
//! update that detects expiry neither moves nor ages the particle. With a
//! constant `dt`, a particle spawned with life `L` is aged `ceil(L / dt)`
//! times and dies on the following update.

use glam::{Quat, Vec3, Vec4};

use crate::particles::billboard::{DrawSubmission, ViewBasis};
use crate::particles::emitter::EmitterId;
use crate::particles::texture::TextureHandle;

/// Attributes stamped onto a slot when it is spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnParams {
    pub position: Vec3,
    pub direction: Vec3,
    pub speed: f32,
    /// Roll in degrees; stored on the particle in radians.
    pub rotation_degrees: f32,
    pub size: f32,
    pub life: f32,
    pub color: Vec4,
    pub texture: Option<TextureHandle>,
}

/// Result of advancing a particle by one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LifeStep {
    /// Still alive after integrating this update.
    Alive,
    /// Life budget reached; the caller must run the death handling.
    Died { death_position: Vec3 },
}

/// One slot of the shared particle pool.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// True while the slot is owned by an emitter.
    pub active: bool,
    pub position: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
    pub speed: f32,
    /// Roll around the billboard normal, in radians.
    pub rotation: f32,
    pub size: f32,
    pub color: Vec4,
    pub texture: Option<TextureHandle>,
    /// Total life budget in seconds.
    pub life: f32,
    /// Elapsed age in seconds.
    pub life_time: f32,
    /// Billboard orientation, recomputed every update.
    pub facing: Quat,
    /// Position captured when the particle expired.
    pub death_position: Vec3,
    pub owner: Option<EmitterId>,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            active: false,
            position: Vec3::ZERO,
            direction: Vec3::Y,
            speed: 0.0,
            rotation: 0.0,
            size: 1.0,
            color: Vec4::ONE,
            texture: None,
            life: 0.0,
            life_time: 0.0,
            facing: Quat::IDENTITY,
            death_position: Vec3::ZERO,
            owner: None,
        }
    }
}

impl Particle {
    /// Stamp spawn attributes onto this slot and mark it owned by `owner`.
    ///
    /// All per-life bookkeeping is reset so nothing leaks from the slot's
    /// previous occupant. The facing is taken from `view` right away so a
    /// particle drawn before its first advance still faces the camera.
    pub fn activate(&mut self, owner: EmitterId, params: &SpawnParams, view: &ViewBasis) {
        self.active = true;
        self.position = params.position;
        self.direction = params.direction.normalize_or(Vec3::Y);
        self.speed = params.speed;
        self.rotation = params.rotation_degrees.to_radians();
        self.size = params.size;
        self.life = params.life;
        self.life_time = 0.0;
        self.color = params.color;
        self.texture = params.texture;
        self.facing = view.facing(self.rotation);
        self.death_position = params.position;
        self.owner = Some(owner);
    }

    /// True when the accumulated age has reached the life budget.
    pub fn is_expired(&self) -> bool {
        self.life_time >= self.life
    }

    /// Advance one update: integrate motion, face the viewer and age.
    ///
    /// When the life budget is already spent the particle does not move;
    /// its position is captured in `death_position` and [`LifeStep::Died`]
    /// is returned. Releasing the slot is left to the caller.
    pub fn advance(&mut self, dt: f32, view: &ViewBasis) -> LifeStep {
        if self.is_expired() {
            self.death_position = self.position;
            return LifeStep::Died {
                death_position: self.death_position,
            };
        }

        self.position += self.direction * (self.speed * dt);
        self.facing = view.facing(self.rotation);
        self.life_time += dt;
        LifeStep::Alive
    }

    /// Build the draw call for this particle, if it is visible.
    ///
    /// Inactive particles and particles without a resolved texture draw
    /// nothing.
    pub fn submission(&self) -> Option<DrawSubmission> {
        if !self.active {
            return None;
        }
        let texture = self.texture?;
        Some(DrawSubmission::new(
            self.position,
            self.facing,
            self.size,
            texture,
            self.color,
        ))
    }
}
