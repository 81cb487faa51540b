//! Simulation mode helpers for system scheduling.
use bevy_ecs::prelude::*;

use crate::resources::gamestate::{GameState, GameStates};

/// Run condition: true while the simulation is [`GameStates::Playing`].
///
/// Also read by the particle update to gate spawns and death bursts.
pub fn state_is_playing(state: Res<GameState>) -> bool {
    matches!(state.get(), GameStates::Playing)
}
