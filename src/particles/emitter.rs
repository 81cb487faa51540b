//! Per-attachment spawn scheduler.
//!
//! An [`Emitter`] accumulates time and, once its spawn interval has elapsed,
//! makes exactly one spawn attempt and resets its timer. Unlike a catch-up
//! emitter it never backfills missed spawns: a single huge `dt` still yields
//! at most one particle. An interval of zero or less disables spawning.
//!
//! Spawned particles copy the emitter's template (speed, direction, rotation,
//! size, life, color, texture) and start at the attachment point plus the
//! emitter's local offset. The emitter keeps the pool indices of every
//! particle it owns in spawn order.

use fastrand::Rng;
use glam::{Vec3, Vec4};
use log::warn;

use crate::particles::billboard::ViewBasis;
use crate::particles::error::ParticleError;
use crate::particles::particle::SpawnParams;
use crate::particles::pool::ParticlePool;
use crate::particles::texture::{TextureHandle, TextureResolver};

/// Index of an emitter inside a [`ParticleManager`](crate::particles::manager::ParticleManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EmitterId(pub usize);

/// Scheduler state after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitterState {
    /// Timer still below the interval (or spawning disabled).
    Idle,
    /// Interval reached; one spawn must be attempted and the timer was reset.
    Fired,
}

/// What happened during [`Emitter::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Idle,
    Spawned(usize),
    /// The emitter fired but the pool had no free slot.
    Skipped,
}

/// Sample a value in `[min, max]`; a degenerate range returns `min`.
#[inline]
fn random_f32_range(rng: &mut Rng, min: f32, max: f32) -> f32 {
    let range = max - min;
    if range < f32::EPSILON {
        return min;
    }
    min + rng.f32() * range
}

/// Spawn scheduler and particle template.
#[derive(Debug, Clone)]
pub struct Emitter {
    /// Assigned by the manager on registration.
    pub id: EmitterId,
    /// Persistent identifier used to link sub-emitters across save/load.
    pub uuid: u32,
    /// World position of the attachment point, refreshed by the scene.
    pub origin: Vec3,
    /// Spawn offset relative to `origin`.
    pub position: Vec3,
    /// Seconds between spawns. `<= 0` disables spawning.
    pub spawn_interval: f32,
    /// Seconds accumulated since the last fire.
    pub timer: f32,
    pub speed: f32,
    pub direction: Vec3,
    /// Roll range in degrees, stored as (min, max).
    pub rotation: (f32, f32),
    pub size: f32,
    pub life: f32,
    pub color: Vec4,
    pub texture_path: String,
    pub texture: Option<TextureHandle>,
    texture_warned: bool,
    /// Target of the death burst, if any.
    pub sub_emitter: Option<EmitterId>,
    /// Particles spawned through `sub_emitter` when one of ours dies.
    pub particles_burst: u32,
    /// Sub-emitter UUID read from a record, resolved by the manager.
    pub(crate) pending_sub_emitter: Option<u32>,
    tracked: Vec<usize>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            id: EmitterId(0),
            uuid: 0,
            origin: Vec3::ZERO,
            position: Vec3::ZERO,
            spawn_interval: 0.0,
            timer: 0.0,
            speed: 1.0,
            direction: Vec3::Y,
            rotation: (0.0, 0.0),
            size: 1.0,
            life: 1.0,
            color: Vec4::ONE,
            texture_path: String::new(),
            texture: None,
            texture_warned: false,
            sub_emitter: None,
            particles_burst: 0,
            pending_sub_emitter: None,
            tracked: Vec::new(),
        }
    }
}

impl Emitter {
    /// Create an emitter with a random UUID and default template.
    pub fn new() -> Self {
        Self {
            uuid: fastrand::u32(1..),
            ..Self::default()
        }
    }

    pub fn with_spawn_interval(mut self, seconds: f32) -> Self {
        self.spawn_interval = seconds;
        self
    }

    pub fn with_life(mut self, seconds: f32) -> Self {
        self.life = seconds;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_direction(mut self, direction: Vec3) -> Self {
        self.direction = direction.normalize_or(Vec3::Y);
        self
    }

    /// Fixed roll in degrees.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = (degrees, degrees);
        self
    }

    /// Random roll range in degrees; bounds are normalised to (min, max).
    pub fn with_rotation_range(mut self, a: f32, b: f32) -> Self {
        self.rotation = (a.min(b), a.max(b));
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.position = offset;
        self
    }

    pub fn with_texture_path(mut self, path: impl Into<String>) -> Self {
        self.set_texture_path(path);
        self
    }

    /// Change the texture path. The handle must be resolved again.
    pub fn set_texture_path(&mut self, path: impl Into<String>) {
        self.texture_path = path.into();
        self.texture = None;
        self.texture_warned = false;
    }

    /// Resolve `texture_path` through `resolver`.
    ///
    /// An unresolved path leaves particles simulating but invisible and is
    /// logged once per path. An empty path means "no texture" and is not
    /// reported.
    pub fn resolve_texture(&mut self, resolver: &impl TextureResolver) -> Result<TextureHandle, ParticleError> {
        self.texture = resolver.resolve(&self.texture_path);
        match self.texture {
            Some(handle) => Ok(handle),
            None => {
                let err = ParticleError::MissingTexture {
                    path: self.texture_path.clone(),
                };
                if self.take_texture_warning() {
                    warn!("Emitter {:?}: {}", self.id, err);
                }
                Err(err)
            }
        }
    }

    /// True the first time a missing texture should be reported for the
    /// current path, false afterwards and for an empty path.
    fn take_texture_warning(&mut self) -> bool {
        if self.texture_path.is_empty() || self.texture_warned {
            return false;
        }
        self.texture_warned = true;
        true
    }

    /// Pool indices of the particles this emitter owns, in spawn order.
    pub fn tracked(&self) -> &[usize] {
        &self.tracked
    }

    /// World-space spawn point.
    pub fn spawn_point(&self) -> Vec3 {
        self.origin + self.position
    }

    /// Advance the timer by `dt` and report whether the emitter fires.
    ///
    /// Fires at most once per call regardless of how far the timer
    /// overshoots the interval; the timer then restarts from zero.
    pub fn tick(&mut self, dt: f32) -> EmitterState {
        if self.spawn_interval <= 0.0 {
            return EmitterState::Idle;
        }
        self.timer += dt;
        if self.timer >= self.spawn_interval {
            self.timer = 0.0;
            EmitterState::Fired
        } else {
            EmitterState::Idle
        }
    }

    /// Tick the scheduler and spawn one particle if it fired.
    ///
    /// A full pool skips this spawn; nothing is queued for later.
    pub fn update(
        &mut self,
        dt: f32,
        pool: &mut ParticlePool,
        rng: &mut Rng,
        view: &ViewBasis,
    ) -> SpawnOutcome {
        match self.tick(dt) {
            EmitterState::Idle => SpawnOutcome::Idle,
            EmitterState::Fired => match self.spawn(pool, rng, view) {
                Ok(index) => SpawnOutcome::Spawned(index),
                Err(_) => SpawnOutcome::Skipped,
            },
        }
    }

    /// Spawn one particle at the emitter's spawn point.
    pub fn spawn(
        &mut self,
        pool: &mut ParticlePool,
        rng: &mut Rng,
        view: &ViewBasis,
    ) -> Result<usize, ParticleError> {
        let at = self.spawn_point();
        self.activate_at(pool, at, rng, view)
    }

    /// Spawn one particle from this emitter's template at `position`.
    ///
    /// Used for regular spawns and for death bursts, where `position` is the
    /// dying particle's last position.
    pub fn activate_at(
        &mut self,
        pool: &mut ParticlePool,
        position: Vec3,
        rng: &mut Rng,
        view: &ViewBasis,
    ) -> Result<usize, ParticleError> {
        let index = pool.allocate()?;
        let params = SpawnParams {
            position,
            direction: self.direction,
            speed: self.speed,
            rotation_degrees: random_f32_range(rng, self.rotation.0, self.rotation.1),
            size: self.size,
            life: self.life,
            color: self.color,
            texture: self.texture,
        };
        if let Some(slot) = pool.get_mut(index) {
            slot.activate(self.id, &params, view);
        }
        self.tracked.push(index);
        Ok(index)
    }

    /// Stop tracking `index`. Returns whether it was tracked.
    pub fn untrack(&mut self, index: usize) -> bool {
        match self.tracked.iter().position(|&i| i == index) {
            Some(pos) => {
                self.tracked.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every tracked index, returning them.
    pub(crate) fn take_tracked(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.tracked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-6;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    struct OneTexture;

    impl TextureResolver for OneTexture {
        fn resolve(&self, path: &str) -> Option<TextureHandle> {
            (path == "smoke.png").then_some(TextureHandle(1))
        }
    }

    #[test]
    fn test_default_emitter_never_fires() {
        let mut e = Emitter::default();
        for _ in 0..100 {
            assert_eq!(e.tick(10.0), EmitterState::Idle);
        }
    }

    #[test]
    fn test_negative_interval_never_fires() {
        let mut e = Emitter::default().with_spawn_interval(-1.0);
        assert_eq!(e.tick(5.0), EmitterState::Idle);
    }

    #[test]
    fn test_fires_when_interval_reached_and_resets() {
        let mut e = Emitter::default().with_spawn_interval(1.0);
        assert_eq!(e.tick(0.5), EmitterState::Idle);
        assert_eq!(e.tick(0.5), EmitterState::Fired);
        assert!(approx_eq(e.timer, 0.0));
    }

    #[test]
    fn test_large_dt_fires_once_without_backfill() {
        let mut e = Emitter::default().with_spawn_interval(1.0);
        assert_eq!(e.tick(5.0), EmitterState::Fired);
        assert!(approx_eq(e.timer, 0.0));
        assert_eq!(e.tick(0.5), EmitterState::Idle);
    }

    #[test]
    fn test_spawn_stamps_template_and_tracks() {
        let mut pool = ParticlePool::new(4);
        let mut rng = Rng::with_seed(1);
        let mut e = Emitter::default()
            .with_spawn_interval(0.5)
            .with_speed(3.0)
            .with_direction(Vec3::new(0.0, 0.0, 2.0))
            .with_offset(Vec3::new(0.0, 1.0, 0.0))
            .with_rotation(90.0)
            .with_life(2.0);
        e.id = EmitterId(3);
        e.origin = Vec3::new(5.0, 0.0, 0.0);

        let index = match e.update(0.5, &mut pool, &mut rng, &ViewBasis::default()) {
            SpawnOutcome::Spawned(i) => i,
            other => panic!("expected spawn, got {:?}", other),
        };
        let p = pool.get(index).unwrap();
        assert!(p.active);
        assert_eq!(p.owner, Some(EmitterId(3)));
        assert_eq!(p.position, Vec3::new(5.0, 1.0, 0.0));
        assert_eq!(p.direction, Vec3::Z);
        assert!(approx_eq(p.speed, 3.0));
        assert!(approx_eq(p.life, 2.0));
        assert!(approx_eq(p.rotation, std::f32::consts::FRAC_PI_2));
        assert_eq!(e.tracked(), &[index]);
    }

    #[test]
    fn test_full_pool_skips_spawn() {
        let mut pool = ParticlePool::new(0);
        let mut rng = Rng::with_seed(1);
        let mut e = Emitter::default().with_spawn_interval(0.1);
        assert_eq!(
            e.update(0.1, &mut pool, &mut rng, &ViewBasis::default()),
            SpawnOutcome::Skipped
        );
        assert!(e.tracked().is_empty());
        assert!(matches!(
            e.spawn(&mut pool, &mut rng, &ViewBasis::default()),
            Err(ParticleError::PoolExhausted)
        ));
    }

    #[test]
    fn test_rotation_range_samples_within_bounds() {
        let mut pool = ParticlePool::new(32);
        let mut rng = Rng::with_seed(7);
        let mut e = Emitter::default().with_rotation_range(90.0, -90.0);
        assert_eq!(e.rotation, (-90.0, 90.0));
        for _ in 0..32 {
            let i = e.spawn(&mut pool, &mut rng, &ViewBasis::default()).unwrap();
            let r = pool.get(i).unwrap().rotation;
            assert!(r >= -std::f32::consts::FRAC_PI_2 - EPSILON);
            assert!(r <= std::f32::consts::FRAC_PI_2 + EPSILON);
        }
    }

    #[test]
    fn test_untrack_removes_once() {
        let mut pool = ParticlePool::new(3);
        let mut rng = Rng::with_seed(1);
        let mut e = Emitter::default();
        let a = e.spawn(&mut pool, &mut rng, &ViewBasis::default()).unwrap();
        let b = e.spawn(&mut pool, &mut rng, &ViewBasis::default()).unwrap();
        assert!(e.untrack(a));
        assert!(!e.untrack(a));
        assert_eq!(e.tracked(), &[b]);
    }

    #[test]
    fn test_resolve_texture() {
        let mut e = Emitter::default().with_texture_path("smoke.png");
        assert_eq!(e.resolve_texture(&OneTexture).unwrap(), TextureHandle(1));

        e.set_texture_path("missing.png");
        assert!(matches!(
            e.resolve_texture(&OneTexture),
            Err(ParticleError::MissingTexture { .. })
        ));
        assert!(e.texture.is_none());
    }

    #[test]
    fn test_missing_texture_is_reported_once_per_path() {
        let mut e = Emitter::default().with_texture_path("missing.png");
        assert!(e.resolve_texture(&OneTexture).is_err());
        assert!(e.texture_warned);
        assert!(e.resolve_texture(&OneTexture).is_err());
        // Both failures share the single report taken by the first one.
        assert!(!e.take_texture_warning());

        e.set_texture_path("also-missing.png");
        assert!(!e.texture_warned);
        assert!(e.resolve_texture(&OneTexture).is_err());
        assert!(e.texture_warned);
        assert!(!e.take_texture_warning());
    }

    #[test]
    fn test_empty_texture_path_is_never_reported() {
        let mut e = Emitter::default();
        assert!(e.resolve_texture(&OneTexture).is_err());
        assert!(!e.texture_warned);
        assert!(!e.take_texture_warning());
    }
}
