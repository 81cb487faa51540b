//! Simulation mode resource.
//!
//! Particle emitters only spawn while the state is [`GameStates::Playing`];
//! while editing or paused, existing particles keep aging with whatever delta
//! the clock supplies but no new ones appear and deaths do not burst.

use bevy_ecs::prelude::Resource;

/// Discrete modes the application can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameStates {
    #[default]
    Editing,
    Playing,
    Paused,
}

/// Authoritative current simulation mode.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct GameState {
    current: GameStates,
}

impl GameState {
    /// Create a new state initialized to [`GameStates::Editing`].
    pub fn new() -> Self {
        GameState {
            current: GameStates::Editing,
        }
    }
    /// Read-only access to the current state.
    pub fn get(&self) -> &GameStates {
        &self.current
    }
    /// Update the current state immediately.
    pub fn set(&mut self, state: GameStates) {
        self.current = state;
    }
}
