//! Room countdown and the end of a lost run.
use bevy_ecs::prelude::*;
use log::info;

use crate::events::audio::AudioCue;
use crate::events::flow::{GameOverEvent, GameSignal};
use crate::events::hud::HudCmd;
use crate::resources::runstate::RunState;
use crate::resources::worldtime::WorldTime;

/// Counts the room timer down and ends the run when it hits zero.
///
/// Frozen while paused, after the run ended, and once the room is completed.
pub fn countdown_system(time: Res<WorldTime>, mut run: ResMut<RunState>, mut commands: Commands) {
    if run.tick_countdown(time.delta) {
        commands.trigger(GameOverEvent {
            reason: "Time's up!".to_string(),
        });
    }
}

/// Ends an active run: flags it, shows the game-over screen and tells the
/// host.
pub fn game_over_observer(
    trigger: On<GameOverEvent>,
    mut run: ResMut<RunState>,
    mut hud: MessageWriter<HudCmd>,
    mut audio: MessageWriter<AudioCue>,
    mut signals: MessageWriter<GameSignal>,
) {
    if !run.is_active() {
        return;
    }
    let reason = trigger.event().reason.clone();
    run.set_game_over();
    hud.write(HudCmd::ShowGameOver {
        reason: reason.clone(),
    });
    audio.write(AudioCue::GameOver);
    info!("game over in room {}: {}", run.current_room(), reason);
    signals.write(GameSignal::GameOver { reason });
}
