//! Display intents pushed to the HUD.
//!
//! The core never reads HUD state back. Durations are in milliseconds; a
//! duration of 0 keeps the message until it is replaced.
use bevy_ecs::message::Message;
use bevy_ecs::prelude::{Messages, World};
use serde::Serialize;

/// Figures shown on the victory screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VictoryStats {
    /// Seconds of active play.
    pub total_time: f32,
    pub rooms_completed: u32,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub enum HudCmd {
    ShowMessage { text: String, duration_ms: u32 },
    /// Advisory prompt for the targeted entity.
    ShowPrompt { text: String },
    ClearPrompt,
    SetInteractionLog { entries: Vec<String>, title: String },
    ClearInteractionLog,
    ShowGameOver { reason: String },
    ShowVictory { stats: VictoryStats },
    /// Hides the game-over and victory overlays.
    HideOverlays,
}

impl HudCmd {
    pub fn message(text: impl Into<String>, duration_ms: u32) -> Self {
        HudCmd::ShowMessage {
            text: text.into(),
            duration_ms,
        }
    }

    pub fn log(entries: Vec<String>, title: impl Into<String>) -> Self {
        HudCmd::SetInteractionLog {
            entries,
            title: title.into(),
        }
    }
}

/// Queues a HUD intent from exclusive world code.
pub fn push_hud(world: &mut World, cmd: HudCmd) {
    world.resource_mut::<Messages<HudCmd>>().write(cmd);
}
