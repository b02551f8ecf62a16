//! Bridge that carries the core's outgoing intents to the host.
//!
//! Systems write [`AudioCue`], [`HudCmd`] and [`GameSignal`] messages inside
//! the world. Once per frame the forwarding systems in
//! [`crate::systems::bridge`] push them into crossbeam channels; the host
//! drains the receiving ends returned by [`setup_host_bridge`].

use crate::events::audio::AudioCue;
use crate::events::flow::GameSignal;
use crate::events::hud::HudCmd;
use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Sending half of the host channels, owned by the world.
#[derive(Resource)]
pub struct HostBridge {
    pub tx_audio: Sender<AudioCue>,
    pub tx_hud: Sender<HudCmd>,
    pub tx_signal: Sender<GameSignal>,
}

/// Receiving half of the host channels, owned by the host.
pub struct HostReceivers {
    pub audio: Receiver<AudioCue>,
    pub hud: Receiver<HudCmd>,
    pub signals: Receiver<GameSignal>,
}

/// Creates the channels and registers the bridge and message resources.
///
/// This function:
/// - Creates one unbounded channel per intent kind.
/// - Inserts [`HostBridge`] with the senders.
/// - Initializes `Messages<AudioCue>`, `Messages<HudCmd>` and
///   `Messages<GameSignal>` so that systems can write them.
pub fn setup_host_bridge(world: &mut World) -> HostReceivers {
    let (tx_audio, audio) = unbounded::<AudioCue>();
    let (tx_hud, hud) = unbounded::<HudCmd>();
    let (tx_signal, signals) = unbounded::<GameSignal>();

    world.insert_resource(HostBridge {
        tx_audio,
        tx_hud,
        tx_signal,
    });
    world.insert_resource(Messages::<AudioCue>::default());
    world.insert_resource(Messages::<HudCmd>::default());
    world.insert_resource(Messages::<GameSignal>::default());

    HostReceivers {
        audio,
        hud,
        signals,
    }
}
