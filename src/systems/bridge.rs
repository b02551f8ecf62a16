//! Systems that hand queued intents over to the host.
//!
//! Per frame, run [`update_host_messages`] then the three `forward_*`
//! systems. Messages written anywhere in the world since the last frame are
//! pushed into the [`HostBridge`] channels exactly once.
use crate::events::audio::AudioCue;
use crate::events::flow::GameSignal;
use crate::events::hud::HudCmd;
use crate::resources::bridge::HostBridge;
use bevy_ecs::prelude::{MessageReader, Messages, Res, ResMut};

/// Advance the ECS message queues so this frame's writes become readable.
pub fn update_host_messages(
    mut audio: ResMut<Messages<AudioCue>>,
    mut hud: ResMut<Messages<HudCmd>>,
    mut signals: ResMut<Messages<GameSignal>>,
) {
    audio.update();
    hud.update();
    signals.update();
}

/// Forward audio cues to the host channel.
pub fn forward_audio_cues(bridge: Res<HostBridge>, mut reader: MessageReader<AudioCue>) {
    for cue in reader.read() {
        // The host may have dropped its receiver on shutdown.
        let _ = bridge.tx_audio.send(*cue);
    }
}

/// Forward HUD intents to the host channel.
pub fn forward_hud_cmds(bridge: Res<HostBridge>, mut reader: MessageReader<HudCmd>) {
    for cmd in reader.read() {
        let _ = bridge.tx_hud.send(cmd.clone());
    }
}

/// Forward game signals to the host channel.
pub fn forward_game_signals(bridge: Res<HostBridge>, mut reader: MessageReader<GameSignal>) {
    for signal in reader.read() {
        let _ = bridge.tx_signal.send(signal.clone());
    }
}
