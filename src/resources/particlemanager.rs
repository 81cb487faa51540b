//! ECS resource wrapping the [`ParticleManager`].
//!
//! The manager itself is engine-agnostic; this newtype lets systems reach it
//! through `Res`/`ResMut` like any other resource.

use bevy_ecs::prelude::Resource;

use crate::particles::manager::ParticleManager;

#[derive(Resource, Debug)]
pub struct ParticleManagerRes(pub ParticleManager);

impl ParticleManagerRes {
    pub fn new(capacity: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => ParticleManagerRes(ParticleManager::with_seed(capacity, seed)),
            None => ParticleManagerRes(ParticleManager::new(capacity)),
        }
    }
}
