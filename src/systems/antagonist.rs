//! The shadow that chases the player from a configured room onward.
//!
//! It moves straight at the player on the floor plane, plays a heartbeat cue
//! while close, and ends the run when it reaches the capture distance (unless
//! the config disables capture).
use std::f32::consts::TAU;

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::info;

use crate::components::antagonist::{
    Antagonist, BOB_HEIGHT, HEARTBEAT_INTERVAL, HEARTBEAT_RANGE, HOVER_HEIGHT,
};
use crate::components::roomscoped::RoomScoped;
use crate::components::rotation::Rotation;
use crate::components::worldposition::WorldPosition;
use crate::events::audio::AudioCue;
use crate::events::flow::{GameOverEvent, RoomEnteredEvent};
use crate::resources::gameconfig::GameConfig;
use crate::resources::playerview::PlayerView;
use crate::resources::rng::GameRng;
use crate::resources::roomlayout::RoomLayout;
use crate::resources::runstate::RunState;
use crate::resources::worldtime::WorldTime;

/// Fraction of the local door offset at which the antagonist appears.
const SPAWN_DOOR_FACTOR: f32 = 0.6;

/// Places the antagonist in a freshly built room, if the room is late enough.
pub fn spawn_antagonist_on_room_entered(
    trigger: On<RoomEnteredEvent>,
    mut commands: Commands,
    config: Res<GameConfig>,
    layout: Res<RoomLayout>,
    existing: Query<Entity, With<Antagonist>>,
    mut rng: ResMut<GameRng>,
) {
    for entity in existing.iter() {
        commands.entity(entity).despawn();
    }
    let room = trigger.event().room;
    if room < config.antagonist_start_room {
        return;
    }
    let origin = layout.origin_of(room);
    let door = layout.local_door(room);
    let pos = Vec3::new(
        origin.x + door.x * SPAWN_DOOR_FACTOR,
        HOVER_HEIGHT,
        origin.z + door.z * SPAWN_DOOR_FACTOR,
    );
    let mut antagonist = Antagonist::new(config.antagonist_speed, config.capture_distance);
    antagonist.bob_time = rng.0.f32() * TAU;
    commands.spawn((antagonist, WorldPosition { pos }, Rotation::default(), RoomScoped));
    info!("room {room}: antagonist spawned at ({:.2}, {:.2})", pos.x, pos.z);
}

/// Moves every antagonist toward the player and checks for capture.
pub fn antagonist_pursuit_system(
    time: Res<WorldTime>,
    run: Res<RunState>,
    config: Res<GameConfig>,
    view: Res<PlayerView>,
    mut query: Query<(&mut Antagonist, &mut WorldPosition, &mut Rotation)>,
    mut audio: MessageWriter<AudioCue>,
    mut commands: Commands,
) {
    if !run.is_interactive() {
        return;
    }
    let dt = time.delta;
    for (mut antagonist, mut position, mut rotation) in query.iter_mut() {
        let mut to_player = view.position - position.pos;
        to_player.y = 0.0;
        let distance = to_player.length();

        antagonist.heartbeat_cooldown = (antagonist.heartbeat_cooldown - dt).max(0.0);
        if distance < HEARTBEAT_RANGE
            && distance > antagonist.capture_distance
            && antagonist.heartbeat_cooldown <= 0.0
        {
            audio.write(AudioCue::ChaseHeartbeat);
            antagonist.heartbeat_cooldown = HEARTBEAT_INTERVAL;
        }

        if distance > f32::EPSILON {
            rotation.yaw = to_player.x.atan2(to_player.z);
        }
        if distance > antagonist.capture_distance {
            position.pos += to_player / distance * antagonist.speed * dt;
        }
        antagonist.bob_time += dt * 2.0;
        position.pos.y = HOVER_HEIGHT + antagonist.bob_time.sin() * BOB_HEIGHT;

        if distance <= antagonist.capture_distance && config.capture_ends_run {
            commands.trigger(GameOverEvent {
                reason: "The shadow caught you!".to_string(),
            });
        }
    }
}
