use bevy_ecs::message::Message;
use bevy_ecs::prelude::{Messages, World};

/// Sound cues requested by the core. The host maps them to actual sounds.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Pickup,
    DoorOpen,
    Success,
    Failure,
    Victory,
    GameOver,
    ChaseHeartbeat,
}

/// Queues a cue from exclusive world code.
pub fn push_audio(world: &mut World, cue: AudioCue) {
    world.resource_mut::<Messages<AudioCue>>().write(cue);
}
