//! Key spawning.
//!
//! Keys appear when the room's puzzle is solved. One key per required key;
//! the first two sit at fixed spots, any further ones on a circle around the
//! room center. Every spot is kept one unit away from the walls.
use std::f32::consts::TAU;

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{info, warn};

use crate::components::emissive::Emissive;
use crate::components::interactable::Interactable;
use crate::components::roomscoped::RoomScoped;
use crate::components::rotation::Rotation;
use crate::components::spin::{Bob, Spin};
use crate::components::worldposition::{Extent, WorldPosition};
use crate::events::flow::PuzzleSolvedEvent;
use crate::resources::puzzle::PuzzleSession;
use crate::resources::rng::GameRng;
use crate::resources::roomlayout::RoomLayout;
use crate::resources::runstate::RunState;

const KEY_SPOTS: [(f32, f32); 2] = [(-4.0, -3.0), (4.0, 3.0)];
const KEY_HEIGHT: f32 = 1.5;
const KEY_CIRCLE_RADIUS: f32 = 4.0;
const KEY_BOB_AMPLITUDE: f32 = 0.15;
const KEY_BOB_FREQUENCY: f32 = 1.5;
const KEY_GLOW: Emissive = Emissive {
    color: 0xffd700,
    intensity: 0.8,
};

/// Local position of key `index` out of `count`.
pub fn key_local_position(index: u32, count: u32, half: f32) -> Vec3 {
    let (x, z) = match KEY_SPOTS.get(index as usize) {
        Some(&spot) => spot,
        None => {
            let angle = index as f32 / count.max(1) as f32 * TAU;
            (angle.cos() * KEY_CIRCLE_RADIUS, angle.sin() * KEY_CIRCLE_RADIUS)
        }
    };
    let limit = half - 1.0;
    Vec3::new(x.clamp(-limit, limit), KEY_HEIGHT, z.clamp(-limit, limit))
}

/// Spawns the keys of the room whose puzzle was just solved.
pub fn spawn_keys_on_puzzle_solved(
    trigger: On<PuzzleSolvedEvent>,
    mut commands: Commands,
    run: Res<RunState>,
    puzzle: Res<PuzzleSession>,
    layout: Res<RoomLayout>,
    mut rng: ResMut<GameRng>,
) {
    let event = trigger.event();
    if event.room != run.current_room() || event.session != puzzle.id() {
        warn!(
            "puzzle solved for room {} session {} is stale, no keys spawned",
            event.room, event.session
        );
        return;
    }
    let count = run.keys_required().max(1);
    for index in 0..count {
        let local = key_local_position(index, count, layout.half_size());
        let pos = layout.to_world(event.room, local);
        commands.spawn((
            Interactable::Key {
                index: index as usize,
            },
            WorldPosition { pos },
            Extent::new(0.2, 0.075, 0.04),
            KEY_GLOW,
            Rotation::default(),
            Spin {
                yaw_rate: 1.5 + rng.0.f32() * 0.5,
                pitch_rate: 0.0,
            },
            Bob {
                base_y: pos.y,
                amplitude: KEY_BOB_AMPLITUDE,
                frequency: KEY_BOB_FREQUENCY,
                phase: index as f32 * 0.5,
            },
            RoomScoped,
        ));
    }
    info!("room {}: {} key(s) spawned", event.room, count);
}
