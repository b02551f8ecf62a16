//! Ownership links for puzzle entities.
//!
//! - [`PuzzleOwned`] ties a spawned entity to the puzzle session that created
//!   it. Dispatch compares the id against the live session and drops stale
//!   interactions.
//! - [`PartOf`] marks a sub-part of a compound object (a keypad digit label);
//!   raycast hits on it resolve to the parent.
use bevy_ecs::prelude::{Component, Entity};

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleOwned {
    pub session: u64,
}

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartOf(pub Entity);
