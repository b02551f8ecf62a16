//! Game flow events.
//!
//! Observer events drive reactions inside the world:
//! - [`PuzzleSolvedEvent`] spawns the room's keys.
//! - [`DoorEnteredEvent`] starts the (debounced) room transition.
//! - [`RoomEnteredEvent`] places the antagonist once a room is built.
//! - [`GameOverEvent`] ends the run on timeout or capture.
//!
//! [`GameSignal`] messages are the event surface the host observes to drive
//! its own UI and persistence side effects.
use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;

/// The live puzzle of `room` was completed.
#[derive(Event, Debug, Clone, Copy)]
pub struct PuzzleSolvedEvent {
    pub room: u32,
    pub session: u64,
}

/// The player walked through the open door of `room`.
#[derive(Event, Debug, Clone, Copy)]
pub struct DoorEnteredEvent {
    pub room: u32,
}

/// `room` has just been (re)built.
#[derive(Event, Debug, Clone, Copy)]
pub struct RoomEnteredEvent {
    pub room: u32,
}

#[derive(Event, Debug, Clone)]
pub struct GameOverEvent {
    pub reason: String,
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub enum GameSignal {
    RoomEntered { room: u32 },
    RoomTransitionRequested { from_room: u32 },
    PuzzleSolved { room: u32 },
    Victory,
    GameOver { reason: String },
}

/// Queues a signal from exclusive world code.
pub fn push_signal(world: &mut World, signal: GameSignal) {
    world.resource_mut::<Messages<GameSignal>>().write(signal);
}
