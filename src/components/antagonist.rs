//! The pursuing shadow.
//!
//! Spawned from a configured room index onward. Each frame it walks toward
//! the player on the ground plane; closing inside the capture distance
//! ends the run.
use bevy_ecs::prelude::Component;

/// Distance under which the heartbeat cue plays.
pub const HEARTBEAT_RANGE: f32 = 3.0;
/// Minimum seconds between two heartbeat cues.
pub const HEARTBEAT_INTERVAL: f32 = 1.0;
/// Resting height of the body center.
pub const HOVER_HEIGHT: f32 = 0.5;
pub const BOB_HEIGHT: f32 = 0.08;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Antagonist {
    pub speed: f32,
    pub capture_distance: f32,
    pub bob_time: f32,
    pub heartbeat_cooldown: f32,
}

impl Antagonist {
    pub fn new(speed: f32, capture_distance: f32) -> Self {
        Self {
            speed,
            capture_distance,
            bob_time: 0.0,
            heartbeat_cooldown: 0.0,
        }
    }
}
