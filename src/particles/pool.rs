//! Fixed-capacity particle storage shared by every emitter.
//!
//! The pool is allocated once and never grows. When every slot is active a
//! spawn attempt fails with [`ParticleError::PoolExhausted`] and the caller
//! simply skips it.

use crate::particles::error::ParticleError;
use crate::particles::particle::Particle;

/// Fixed array of particle slots plus an active counter.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    active: usize,
    /// Slot to start the next free-slot search from.
    cursor: usize,
}

impl ParticlePool {
    /// Create a pool with `capacity` inactive slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            active: 0,
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently active. Always within `[0, capacity]`.
    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn is_full(&self) -> bool {
        self.active == self.slots.len()
    }

    /// Reserve the next inactive slot and return its index.
    ///
    /// The slot is marked active immediately so a second allocation in the
    /// same update cannot hand out the same index; the caller stamps the
    /// remaining fields.
    pub fn allocate(&mut self) -> Result<usize, ParticleError> {
        if self.is_full() {
            return Err(ParticleError::PoolExhausted);
        }
        let capacity = self.slots.len();
        for offset in 0..capacity {
            let index = (self.cursor + offset) % capacity;
            if !self.slots[index].active {
                self.slots[index].active = true;
                self.active += 1;
                self.cursor = (index + 1) % capacity;
                return Ok(index);
            }
        }
        Err(ParticleError::PoolExhausted)
    }

    /// Return a slot to the pool.
    ///
    /// Releasing an inactive or out-of-range slot is a no-op. Returns whether
    /// the slot was actually released.
    pub fn release(&mut self, index: usize) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.active => {
                slot.active = false;
                slot.owner = None;
                self.active -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Particle> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.slots.get_mut(index)
    }

    /// Iterate `(index, particle)` over active slots.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &Particle)> {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    /// Append the indices of every active slot to `out`.
    pub fn collect_active(&self, out: &mut Vec<usize>) {
        out.extend(self.iter_active().map(|(i, _)| i));
    }
}
