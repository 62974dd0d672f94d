use crate::resources::gamestate::{GameState, GameStates};
use bevy_ecs::prelude::*;

/// Run condition for the "game ready" gate.
pub fn state_is_playing(state: Res<GameState>) -> bool {
    matches!(state.get(), GameStates::Playing)
}
