//! Escape room game core.
//!
//! This crate exposes the puzzle state machine, the room and door model and
//! the interaction routing of a first-person escape room as ECS components,
//! resources, systems and events, wrapped by the [`game::Game`] facade that a
//! host shell drives once per frame.

pub mod autoplay;
pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;
