//! Game systems.
//!
//! This module groups the ECS systems that advance the simulation each tick,
//! the observers that react to game events, and the exclusive functions that
//! build and tear down rooms.
//!
//! Submodules overview
//! - [`animation`] – spin and bob keys and crystals
//! - [`antagonist`] – spawn the shadow and move it toward the player
//! - [`bridge`] – forward audio cues, HUD intents and game signals to the host
//! - [`countdown`] – room timer and the end of a lost run
//! - [`door`] – copy the door swing onto the panel entity
//! - [`gameflow`] – room setup, transitions, victory and restart
//! - [`interaction`] – route the interact press to keys, door, chest or puzzle
//! - [`keys`] – spawn keys once the puzzle is solved
//! - [`puzzle`] – puzzle objects, submit feedback and the pattern replay
//! - [`scheduler`] – release due timed tasks
//! - [`targeting`] – pick and highlight the single targeted interactable
//! - [`time`] – update simulation time and delta

pub mod animation;
pub mod antagonist;
pub mod bridge;
pub mod countdown;
pub mod door;
pub mod gameflow;
pub mod interaction;
pub mod keys;
pub mod puzzle;
pub mod scheduler;
pub mod targeting;
pub mod time;
