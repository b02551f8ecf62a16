//! Room lifecycle: start, setup, transition, victory and restart.
//!
//! These are exclusive functions over the whole [`World`]. Building a room
//! touches almost every resource and spawns a burst of entities, so it runs
//! outside the per-frame schedule: from the host (`start`, `restart`) or from
//! the scheduler once the transition delay after entering a door has elapsed.
//!
//! ```text
//! start_run ─▶ enter_room ─▶ setup_room ─▶ RoomEnteredEvent
//!                  ▲
//! door_entered_observer ─(delay)─▶ complete_transition ─▶ victory
//! ```
use std::f32::consts::FRAC_PI_2;

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{error, info, warn};

use crate::components::decoration::Decoration;
use crate::components::emissive::Emissive;
use crate::components::interactable::Interactable;
use crate::components::puzzleowned::PuzzleOwned;
use crate::components::roomscoped::RoomScoped;
use crate::components::rotation::Rotation;
use crate::components::worldposition::{Extent, WorldPosition};
use crate::error::SetupError;
use crate::events::audio::{AudioCue, push_audio};
use crate::events::flow::{DoorEnteredEvent, GameSignal, RoomEnteredEvent, push_signal};
use crate::events::hud::{HudCmd, VictoryStats, push_hud};
use crate::resources::door::DoorState;
use crate::resources::gameconfig::GameConfig;
use crate::resources::playerview::PlayerView;
use crate::resources::puzzle::PuzzleSession;
use crate::resources::roomcatalog::{FurnitureKind, FurniturePlacement, RoomCatalog};
use crate::resources::roomlayout::{EYE_HEIGHT, ROOM_HEIGHT, ROOM_SIZE, RoomLayout};
use crate::resources::runstate::RunState;
use crate::resources::savestore::SaveStore;
use crate::resources::scheduler::{Scheduler, TimedTask};
use crate::resources::targeting::Targeting;
use crate::systems::door::place_door_panel;
use crate::systems::puzzle::spawn_puzzle_objects;

/// Distance furniture keeps from the walls.
const FURNITURE_WALL_GAP: f32 = 0.8;

/// Starts a fresh run in `room`, clamped to the catalog.
pub fn start_run(world: &mut World, room: u32) {
    let total = world.resource::<RoomCatalog>().total().max(1);
    let room = room.clamp(1, total);
    world.resource_mut::<RunState>().start(room);
    push_hud(world, HudCmd::HideOverlays);
    push_hud(world, HudCmd::ClearPrompt);
    info!("run started in room {room}/{total}");
    enter_room(world, room);
}

/// Back to room 1 with a fresh puzzle.
pub fn restart_run(world: &mut World) {
    info!("restarting run");
    start_run(world, 1);
}

/// Builds `room`, surfacing setup failures on the HUD instead of aborting.
pub fn enter_room(world: &mut World, room: u32) {
    if let Err(err) = setup_room(world, room) {
        error!("room {room} failed to initialize: {err}");
        push_hud(world, HudCmd::message(format!("⚠️ Failed to load room: {err}"), 0));
    }
}

/// Tears down the previous room and builds `room` from its catalog entry.
pub fn setup_room(world: &mut World, room: u32) -> Result<(), SetupError> {
    let config = world.resource::<RoomCatalog>().get(room)?.clone();
    teardown_room(world);

    let layout = world.resource::<RoomLayout>().clone();
    let origin = layout.origin_of(room);
    world.spawn((
        Decoration::Shell {
            wall_color: config.wall_color,
            floor_color: config.floor_color,
        },
        WorldPosition::new(origin.x, ROOM_HEIGHT / 2.0, origin.z),
        RoomScoped,
    ));

    let mut placed = 0usize;
    for placement in &config.furniture {
        let Some(kind) = FurnitureKind::parse(&placement.kind) else {
            warn!(
                "room {room}: unknown furniture type '{}' skipped",
                placement.kind
            );
            continue;
        };
        spawn_furniture(world, &layout, room, kind, placement);
        placed += 1;
    }

    {
        let mut door = world.resource_mut::<DoorState>();
        door.setup(&layout, room);
    }
    place_door_panel(world);

    let session = spawn_puzzle_objects(world, room);
    let kind = world.resource::<PuzzleSession>().kind();
    world.resource_mut::<RunState>().set_puzzle_kind(kind);

    let start = layout.start_position(room);
    {
        let mut view = world.resource_mut::<PlayerView>();
        view.position = start;
        view.look_at(Vec3::new(origin.x, EYE_HEIGHT, origin.z));
    }

    info!(
        "room {room} '{}' ready: {placed} furniture, {kind:?} puzzle (session {session})",
        config.name
    );
    world.trigger(RoomEnteredEvent { room });
    world.flush();
    push_signal(world, GameSignal::RoomEntered { room });
    Ok(())
}

/// Despawns everything the current room owns and drops the puzzle session.
fn teardown_room(world: &mut World) {
    let doomed: Vec<Entity> = world
        .query_filtered::<Entity, Or<(With<RoomScoped>, With<PuzzleOwned>)>>()
        .iter(world)
        .collect();
    for entity in doomed {
        world.despawn(entity);
    }
    world.resource_mut::<PuzzleSession>().teardown();
    {
        let mut targeting = world.resource_mut::<Targeting>();
        targeting.forget();
        targeting.prompt = None;
    }
    push_hud(world, HudCmd::ClearPrompt);
    push_hud(world, HudCmd::ClearInteractionLog);
}

fn spawn_furniture(
    world: &mut World,
    layout: &RoomLayout,
    room: u32,
    kind: FurnitureKind,
    placement: &FurniturePlacement,
) {
    let limit = ROOM_SIZE / 2.0 - FURNITURE_WALL_GAP;
    let scale = placement.size.unwrap_or(1.0).max(0.1);
    let (hx, hy, hz) = kind.half_extents();
    let mut extent = Extent::new(hx * scale, hy * scale, hz * scale);
    let yaw = placement.rotation.unwrap_or(0.0);
    if (yaw.abs() - FRAC_PI_2).abs() < 1e-3 {
        extent = extent.turned();
    }
    // Catalog heights are centers; a zero height rests the piece on the floor.
    let y = if placement.position.y > 0.0 {
        placement.position.y
    } else {
        extent.half.y
    };
    let local = Vec3::new(
        placement.position.x.clamp(-limit, limit),
        y,
        placement.position.z.clamp(-limit, limit),
    );
    let pos = layout.to_world(room, local);
    let mut entity = world.spawn((
        Decoration::Furniture { kind },
        WorldPosition { pos },
        extent,
        Rotation::from_yaw(yaw),
        RoomScoped,
    ));
    if kind == FurnitureKind::Chest {
        entity.insert((Interactable::Chest, Emissive::OFF));
    }
}

/// Starts the delayed transition out of the room whose door was entered.
///
/// A second signal while a transition is pending is dropped.
pub fn door_entered_observer(
    trigger: On<DoorEnteredEvent>,
    mut run: ResMut<RunState>,
    config: Res<GameConfig>,
    save: Res<SaveStore>,
    mut scheduler: ResMut<Scheduler>,
    mut signals: MessageWriter<GameSignal>,
) {
    let room = trigger.event().room;
    if room != run.current_room() {
        warn!("door of room {room} entered while in room {}", run.current_room());
        return;
    }
    if !run.begin_transition() {
        info!("room {room}: transition already pending, door signal dropped");
        return;
    }
    if let Err(err) = save.save_progress(room) {
        warn!("could not write save point: {err}");
    }
    scheduler.schedule(
        config.transition_delay,
        TimedTask::EnterNextRoom { from_room: room },
    );
    signals.write(GameSignal::RoomTransitionRequested { from_room: room });
    info!("room {room}: transition in {:.1}s", config.transition_delay);
}

/// Finishes a pending transition: next room, or victory after the last one.
pub fn complete_transition(world: &mut World, from_room: u32) {
    {
        let run = world.resource::<RunState>();
        if !run.transition_pending() || run.current_room() != from_room {
            warn!("stale transition out of room {from_room} dropped");
            return;
        }
    }
    let total = world.resource::<RoomCatalog>().total();
    if from_room >= total {
        let stats = {
            let mut run = world.resource_mut::<RunState>();
            run.set_victory();
            VictoryStats {
                total_time: run.play_time(),
                rooms_completed: run.rooms_completed(),
            }
        };
        push_hud(world, HudCmd::ShowVictory { stats });
        push_audio(world, AudioCue::Victory);
        push_signal(world, GameSignal::Victory);
        if let Err(err) = world.resource::<SaveStore>().clear() {
            warn!("could not clear save point: {err}");
        }
        info!(
            "victory: {} rooms in {:.1}s",
            stats.rooms_completed, stats.total_time
        );
        return;
    }
    {
        let mut run = world.resource_mut::<RunState>();
        run.end_transition();
        run.next_room();
    }
    info!("entering room {}", from_room + 1);
    enter_room(world, from_room + 1);
}
