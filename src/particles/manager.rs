//! Particle manager: the pool, the emitter registry and the per-frame pass.
//!
//! A [`ParticleManager`] is an explicitly constructed context object. The
//! engine stores one in the ECS world
//! ([`ParticleManagerRes`](crate::resources::particlemanager::ParticleManagerRes)),
//! but tests can build one directly with no engine state at all.
//!
//! # Update Order
//!
//! [`ParticleManager::update`] runs two phases:
//!
//! 1. [`run_emitters`](ParticleManager::run_emitters): every emitter ticks its
//!    scheduler and may spawn one particle (only while the simulation is
//!    running).
//! 2. [`advance_particles`](ParticleManager::advance_particles): every slot
//!    that was active when the phase started is advanced exactly once, so
//!    particles spawned in phase 1 are aged on their spawn frame.
//!
//! When a particle expires and its emitter has a sub-emitter, the burst
//! children are spawned at the dying particle's position. They are not part
//! of the current pass and start aging on the next update.

use fastrand::Rng;
use glam::Vec3;
use log::{debug, info, warn};
use rustc_hash::FxHashMap;

use crate::particles::billboard::{BillboardRenderer, ViewBasis};
use crate::particles::emitter::{Emitter, EmitterId, SpawnOutcome};
use crate::particles::error::ParticleError;
use crate::particles::particle::LifeStep;
use crate::particles::pool::ParticlePool;
use crate::particles::record::{EmitterRecord, SceneComponent};
use crate::particles::texture::TextureResolver;

/// External state read once per update.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameContext {
    /// Whether the application is in its running simulation mode. Emitters
    /// only spawn, and deaths only burst, while this is true.
    pub running: bool,
    /// Basis of the active camera, for billboard facing.
    pub view: ViewBasis,
}

/// Running totals since the manager was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParticleStats {
    pub spawned: u64,
    pub burst_spawned: u64,
    pub released: u64,
    /// Spawns dropped because the pool was full.
    pub skipped_spawns: u64,
}

/// Owner of the shared pool and every registered emitter.
#[derive(Debug)]
pub struct ParticleManager {
    pool: ParticlePool,
    /// Emitter arena. Ids are indices and are never reused, so the arena
    /// grows by one entry per registration; deregistered entries stay `None`
    /// and registry scans cost one step per registration ever made.
    emitters: Vec<Option<Emitter>>,
    rng: Rng,
    stats: ParticleStats,
    /// Active slots snapshot reused by `advance_particles`.
    scratch: Vec<usize>,
}

impl ParticleManager {
    pub fn new(capacity: usize) -> Self {
        Self::with_rng(capacity, Rng::new())
    }

    /// Manager with a seeded generator for reproducible rotation sampling.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self::with_rng(capacity, Rng::with_seed(seed))
    }

    fn with_rng(capacity: usize, rng: Rng) -> Self {
        info!("Particle pool allocated with {} slots", capacity);
        Self {
            pool: ParticlePool::new(capacity),
            emitters: Vec::new(),
            rng,
            stats: ParticleStats::default(),
            scratch: Vec::with_capacity(capacity),
        }
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    pub fn active_particles(&self) -> usize {
        self.pool.active_count()
    }

    pub fn stats(&self) -> ParticleStats {
        self.stats
    }

    pub fn emitter(&self, id: EmitterId) -> Option<&Emitter> {
        self.emitters.get(id.0).and_then(Option::as_ref)
    }

    pub fn emitter_mut(&mut self, id: EmitterId) -> Option<&mut Emitter> {
        self.emitters.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Iterate live emitters.
    pub fn emitters(&self) -> impl Iterator<Item = &Emitter> {
        self.emitters.iter().flatten()
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters().count()
    }

    /// Add an emitter to the registry and return its id.
    ///
    /// An emitter whose UUID is 0 or already taken by a live emitter gets a
    /// fresh one, so sub-emitter links saved by UUID stay unambiguous.
    pub fn register_emitter(&mut self, mut emitter: Emitter) -> EmitterId {
        let id = EmitterId(self.emitters.len());
        emitter.id = id;
        while emitter.uuid == 0 || self.uuid_in_use(emitter.uuid) {
            emitter.uuid = fastrand::u32(1..);
        }
        debug!(
            "Registered emitter {:?} (uuid {}, interval {}s)",
            id, emitter.uuid, emitter.spawn_interval
        );
        self.emitters.push(Some(emitter));
        id
    }

    fn uuid_in_use(&self, uuid: u32) -> bool {
        self.emitters().any(|e| e.uuid == uuid)
    }

    /// Remove an emitter from the registry.
    ///
    /// Its live particles are released immediately and any emitter using it
    /// as sub-emitter loses that link.
    pub fn deregister_emitter(&mut self, id: EmitterId) -> Result<Emitter, ParticleError> {
        let mut emitter = self
            .emitters
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(ParticleError::UnknownEmitter(id))?;

        for index in emitter.take_tracked() {
            if self.pool.release(index) {
                self.stats.released += 1;
            }
        }
        for other in self.emitters.iter_mut().flatten() {
            if other.sub_emitter == Some(id) {
                other.sub_emitter = None;
                other.pending_sub_emitter = None;
            }
        }
        debug!("Deregistered emitter {:?}", id);
        Ok(emitter)
    }

    /// Set (or clear, with `None`) the emitter that bursts when one of
    /// `parent`'s particles dies.
    ///
    /// Rejects links that would make `parent` reachable from `child`, which
    /// includes pointing an emitter at itself.
    pub fn set_sub_emitter(
        &mut self,
        parent: EmitterId,
        child: Option<EmitterId>,
        particles_burst: u32,
    ) -> Result<(), ParticleError> {
        if self.emitter(parent).is_none() {
            return Err(ParticleError::UnknownEmitter(parent));
        }
        let child_uuid = match child {
            Some(child) => {
                let uuid = self
                    .emitter(child)
                    .map(|e| e.uuid)
                    .ok_or(ParticleError::UnknownEmitter(child))?;
                if self.reaches(child, parent) {
                    return Err(ParticleError::InvalidSubEmitterCycle { parent, child });
                }
                Some(uuid)
            }
            None => None,
        };

        if let Some(e) = self.emitter_mut(parent) {
            e.sub_emitter = child;
            e.particles_burst = particles_burst;
            e.pending_sub_emitter = child_uuid;
        }
        Ok(())
    }

    /// True when following sub-emitter links from `from` arrives at `target`.
    fn reaches(&self, from: EmitterId, target: EmitterId) -> bool {
        let mut current = Some(from);
        // Links are acyclic, but bound the walk anyway.
        for _ in 0..=self.emitters.len() {
            match current {
                Some(id) if id == target => return true,
                Some(id) => current = self.emitter(id).and_then(|e| e.sub_emitter),
                None => return false,
            }
        }
        false
    }

    /// Resolve every emitter's texture path. Failures are logged by the
    /// emitter and leave its particles invisible.
    pub fn resolve_textures(&mut self, resolver: &impl TextureResolver) {
        for emitter in self.emitters.iter_mut().flatten() {
            let _ = emitter.resolve_texture(resolver);
        }
    }

    /// Run one simulation step.
    pub fn update(&mut self, dt: f32, ctx: &FrameContext) {
        self.run_emitters(dt, ctx);
        self.advance_particles(dt, ctx);
    }

    /// Spawn phase: let each emitter fire at most once.
    pub fn run_emitters(&mut self, dt: f32, ctx: &FrameContext) {
        if !ctx.running {
            return;
        }
        let Self {
            pool,
            emitters,
            rng,
            stats,
            ..
        } = self;
        for emitter in emitters.iter_mut().flatten() {
            match emitter.update(dt, pool, rng, &ctx.view) {
                SpawnOutcome::Idle => {}
                SpawnOutcome::Spawned(_) => stats.spawned += 1,
                SpawnOutcome::Skipped => {
                    stats.skipped_spawns += 1;
                    debug!("Emitter {:?}: pool exhausted, spawn skipped", emitter.id);
                }
            }
        }
    }

    /// Aging phase: advance every particle that is active right now.
    pub fn advance_particles(&mut self, dt: f32, ctx: &FrameContext) {
        let mut snapshot = std::mem::take(&mut self.scratch);
        snapshot.clear();
        self.pool.collect_active(&mut snapshot);

        for &index in &snapshot {
            let step = match self.pool.get_mut(index) {
                Some(p) if p.active => p.advance(dt, &ctx.view),
                _ => continue,
            };
            if let LifeStep::Died { death_position } = step {
                self.retire(index, death_position, ctx);
            }
        }

        self.scratch = snapshot;
    }

    /// Death handling for slot `index`: burst through the owner's
    /// sub-emitter, untrack, release.
    fn retire(&mut self, index: usize, death_position: Vec3, ctx: &FrameContext) {
        let owner = self.pool.get(index).and_then(|p| p.owner);

        if ctx.running {
            if let Some(owner) = owner {
                self.burst(owner, death_position, &ctx.view);
            }
        }

        if let Some(emitter) = owner.and_then(|id| self.emitter_mut(id)) {
            emitter.untrack(index);
        }
        if self.pool.release(index) {
            self.stats.released += 1;
        }
    }

    fn burst(&mut self, owner: EmitterId, at: Vec3, view: &ViewBasis) {
        let Some((sub_id, count)) = self
            .emitter(owner)
            .and_then(|e| e.sub_emitter.map(|s| (s, e.particles_burst)))
        else {
            return;
        };

        let Self {
            pool,
            emitters,
            rng,
            stats,
            ..
        } = self;
        let Some(sub) = emitters.get_mut(sub_id.0).and_then(Option::as_mut) else {
            return;
        };

        for spawned in 0..count {
            if sub.activate_at(pool, at, rng, view).is_err() {
                let dropped = u64::from(count - spawned);
                stats.skipped_spawns += dropped;
                debug!(
                    "Burst from {:?} into {:?}: pool exhausted, {} dropped",
                    owner, sub_id, dropped
                );
                break;
            }
            stats.burst_spawned += 1;
        }
    }

    /// Submit every visible particle to `renderer`. Does not touch
    /// simulation state.
    pub fn draw(&self, renderer: &mut impl BillboardRenderer) {
        for (_, particle) in self.pool.iter_active() {
            if let Some(submission) = particle.submission() {
                renderer.draw_billboard(submission);
            }
        }
    }

    /// Records for every live emitter, with sub-emitter links stored by UUID.
    pub fn save_emitters(&self) -> Vec<EmitterRecord> {
        self.emitters()
            .map(|e| {
                let mut record = e.save();
                if let Some(sub) = e.sub_emitter.and_then(|id| self.emitter(id)) {
                    record.sub_emitter = Some(sub.uuid);
                }
                record
            })
            .collect()
    }

    /// Register one emitter per record, resolve textures and relink
    /// sub-emitters by UUID.
    ///
    /// A malformed record, or two records sharing a UUID, aborts before
    /// anything is registered. Links are resolved against the batch first,
    /// since registering may hand a record a new UUID when its own is taken.
    /// Links that would form a cycle are rejected and logged; links whose
    /// target is in neither the batch nor the registry stay pending.
    pub fn load_emitters(
        &mut self,
        records: &[EmitterRecord],
        resolver: &impl TextureResolver,
    ) -> Result<Vec<EmitterId>, ParticleError> {
        let mut loaded = Vec::with_capacity(records.len());
        let mut batch: FxHashMap<u32, usize> = FxHashMap::default();
        for (slot, record) in records.iter().enumerate() {
            let mut emitter = Emitter::default();
            emitter.load(record)?;
            if batch.insert(emitter.uuid, slot).is_some() {
                return Err(ParticleError::DuplicateUuid(emitter.uuid));
            }
            loaded.push(emitter);
        }

        let links: Vec<Option<u32>> = loaded.iter().map(|e| e.pending_sub_emitter).collect();
        let ids: Vec<EmitterId> = loaded
            .into_iter()
            .map(|mut emitter| {
                let _ = emitter.resolve_texture(resolver);
                self.register_emitter(emitter)
            })
            .collect();

        for (slot, link) in links.into_iter().enumerate() {
            let Some(&target) = link.and_then(|uuid| batch.get(&uuid)) else {
                continue;
            };
            let parent = ids[slot];
            let burst = self.emitter(parent).map_or(0, |e| e.particles_burst);
            if let Err(err) = self.set_sub_emitter(parent, Some(ids[target]), burst) {
                if let Some(e) = self.emitter_mut(parent) {
                    e.pending_sub_emitter = None;
                }
                warn!("Sub-emitter link rejected: {}", err);
            }
        }
        for err in self.link_pending_sub_emitters() {
            warn!("Sub-emitter link rejected: {}", err);
        }
        info!("Loaded {} emitters", ids.len());
        Ok(ids)
    }

    /// Resolve sub-emitter UUIDs read from records into links.
    ///
    /// Returns the errors for links that were rejected; those are cleared so
    /// they are not retried.
    pub fn link_pending_sub_emitters(&mut self) -> Vec<ParticleError> {
        let by_uuid: FxHashMap<u32, EmitterId> =
            self.emitters().map(|e| (e.uuid, e.id)).collect();

        let pending: Vec<(EmitterId, EmitterId, u32)> = self
            .emitters()
            .filter(|e| e.sub_emitter.is_none())
            .filter_map(|e| {
                let target = by_uuid.get(&e.pending_sub_emitter?)?;
                Some((e.id, *target, e.particles_burst))
            })
            .collect();

        let mut rejected = Vec::new();
        for (parent, child, burst) in pending {
            if let Err(err) = self.set_sub_emitter(parent, Some(child), burst) {
                if let Some(e) = self.emitter_mut(parent) {
                    e.pending_sub_emitter = None;
                }
                rejected.push(err);
            }
        }
        rejected
    }
}
