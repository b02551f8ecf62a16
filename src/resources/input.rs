//! Per-frame player input relevant to the core.
//!
//! Movement and look are handled by the host; the core only needs the
//! explicit "interact" press. The host sets it with
//! [`Game::press_interact`](crate::game::Game::press_interact) and the
//! interact system consumes it on the next tick.
use bevy_ecs::prelude::*;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct InputState {
    /// Interact was pressed since the last tick.
    pub interact: bool,
}

impl InputState {
    pub fn press_interact(&mut self) {
        self.interact = true;
    }

    /// Returns and clears the pending interact press.
    pub fn take_interact(&mut self) -> bool {
        std::mem::take(&mut self.interact)
    }
}
