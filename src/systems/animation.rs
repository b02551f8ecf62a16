//! Cosmetic motion systems.
//!
//! - [`spin_system`] turns entities with a [`Spin`] (keys, crystals).
//! - [`bob_system`] moves entities with a [`Bob`] up and down around their
//!   base height (keys).
//!
//! Both only change what a renderer would draw. Targeting reads the bobbing
//! position, which is within the interaction radius either way.

use std::f32::consts::TAU;

use bevy_ecs::prelude::*;

use crate::components::rotation::Rotation;
use crate::components::spin::{Bob, Spin};
use crate::components::worldposition::WorldPosition;
use crate::resources::worldtime::WorldTime;

/// Advance yaw and pitch by the spin rates, wrapped to one turn.
pub fn spin_system(mut query: Query<(&Spin, &mut Rotation)>, time: Res<WorldTime>) {
    for (spin, mut rotation) in query.iter_mut() {
        rotation.yaw = (rotation.yaw + spin.yaw_rate * time.delta).rem_euclid(TAU);
        rotation.pitch = (rotation.pitch + spin.pitch_rate * time.delta).rem_euclid(TAU);
    }
}

/// Set the height of bobbing entities from the elapsed time.
pub fn bob_system(mut query: Query<(&Bob, &mut WorldPosition)>, time: Res<WorldTime>) {
    for (bob, mut position) in query.iter_mut() {
        position.pos.y = bob.height_at(time.elapsed);
    }
}
