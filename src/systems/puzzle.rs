//! Puzzle objects in the scene and the feedback around [`PuzzleSession`].
//!
//! The session decides; this module spawns its objects, turns submit
//! outcomes into flashes, HUD intents and cues, and runs the staged pattern
//! replay handed over by the scheduler.
//!
//! All positions below are room-local and converted with
//! [`RoomLayout::to_world`].
use std::f32::consts::FRAC_PI_2;

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::components::decoration::Decoration;
use crate::components::emissive::Emissive;
use crate::components::interactable::{Interactable, OrbColor, TILE_COLORS};
use crate::components::puzzleowned::{PartOf, PuzzleOwned};
use crate::components::rotation::Rotation;
use crate::components::spin::Spin;
use crate::components::worldposition::{Extent, WorldPosition};
use crate::events::audio::AudioCue;
use crate::events::flow::{GameSignal, PuzzleSolvedEvent};
use crate::events::hud::{HudCmd, push_hud};
use crate::resources::puzzle::{PuzzleKind, PuzzleSession, PuzzleToken, SubmitOutcome};
use crate::resources::rng::GameRng;
use crate::resources::roomcatalog::RoomCatalog;
use crate::resources::roomlayout::RoomLayout;
use crate::resources::scheduler::{Scheduler, TimedTask};
use crate::systems::interaction::InteractionContext;

const ORB_SPOTS: [(f32, f32); 4] = [(-5.0, -5.0), (5.0, -5.0), (-5.0, 5.0), (5.0, 5.0)];
const ORB_HEIGHT: f32 = 1.5;
const ORB_RADIUS: f32 = 0.3;
const ORB_IDLE: f32 = 0.5;
const ORB_FLASH: f32 = 1.5;
const ORB_FLASH_TIME: f32 = 0.2;

const KEYPAD_Z: f32 = -7.0;
/// Digit, local x, local y.
const KEYPAD_SPOTS: [(u8, f32, f32); 10] = [
    (1, -3.0, 1.5),
    (2, -2.0, 1.5),
    (3, -1.0, 1.5),
    (4, 0.0, 1.5),
    (5, 1.0, 1.5),
    (6, 2.0, 1.5),
    (7, 3.0, 1.5),
    (8, -2.5, 1.0),
    (9, -1.5, 1.0),
    (0, -0.5, 1.0),
];
const LABEL_OFFSET: f32 = 0.08;
const BUTTON_PRESS: Emissive = Emissive {
    color: 0x00ff00,
    intensity: 0.8,
};
const BUTTON_PRESS_TIME: f32 = 0.3;
const BUTTON_WRONG: Emissive = Emissive {
    color: 0xff0000,
    intensity: 0.5,
};
const BUTTON_WRONG_TIME: f32 = 0.5;

const TILE_SPOTS: [(f32, f32); 4] = [(-2.0, 0.0), (2.0, 0.0), (0.0, -2.0), (0.0, 2.0)];
const TILE_HEIGHT: f32 = 1.5;
const TILE_IDLE: f32 = 0.3;
const TILE_TOUCH: f32 = 1.0;
const TILE_TOUCH_TIME: f32 = 0.2;
const TILE_REPLAY: f32 = 1.5;
const TILE_REPLAY_TIME: f32 = 0.5;
/// Seconds between two tiles of the replay.
pub const PATTERN_STEP_INTERVAL: f32 = 0.8;
/// Pause after the last tile before input opens.
const PATTERN_TAIL: f32 = 0.5;
/// Delay before the pattern is shown again after a wrong attempt.
pub const PATTERN_RETRY_DELAY: f32 = 2.0;

const ITEM_SPOTS: [(f32, f32, f32); 5] = [
    (-5.5, 1.0, -5.5),
    (5.5, 1.0, -5.5),
    (-5.5, 1.0, 5.5),
    (5.5, 1.0, 5.5),
    (0.0, 1.4, 0.0),
];
const ITEM_HALF: f32 = 0.25;
const ITEM_GLOW: Emissive = Emissive {
    color: 0xffd700,
    intensity: 0.8,
};

const BOARD_SPOT: Vec3 = Vec3::new(7.0, 2.0, 0.0);
const SPOTLIGHT_SPOT: Vec3 = Vec3::new(6.0, 3.0, 0.0);

/// Generates the puzzle of `room` and spawns its objects.
///
/// Returns the new session id. The previous session must already be torn
/// down along with its entities.
pub fn spawn_puzzle_objects(world: &mut World, room: u32) -> u64 {
    let kind = PuzzleKind::for_room(room);
    let bonus = world
        .resource::<RoomCatalog>()
        .find(room)
        .and_then(|config| config.bonus_collectibles);
    let session = world.resource_scope(|world, mut rng: Mut<GameRng>| {
        world
            .resource_mut::<PuzzleSession>()
            .generate(kind, bonus, &mut rng.0)
    });
    let layout = world.resource::<RoomLayout>().clone();
    let at = |x: f32, y: f32, z: f32| layout.to_world(room, Vec3::new(x, y, z));

    match kind {
        PuzzleKind::Color => {
            for (color, (x, z)) in OrbColor::ALL.into_iter().zip(ORB_SPOTS) {
                world.spawn((
                    Interactable::ColorOrb { color },
                    WorldPosition {
                        pos: at(x, ORB_HEIGHT, z),
                    },
                    Extent::cube(ORB_RADIUS),
                    Emissive::new(color.rgb(), ORB_IDLE),
                    PuzzleOwned { session },
                ));
            }
        }
        PuzzleKind::Number => {
            for (digit, x, y) in KEYPAD_SPOTS {
                let pos = at(x, y, KEYPAD_Z);
                let button = world
                    .spawn((
                        Interactable::NumberButton { digit },
                        WorldPosition { pos },
                        Extent::new(0.25, 0.25, 0.075),
                        Emissive::OFF,
                        PuzzleOwned { session },
                    ))
                    .id();
                world.spawn((
                    PartOf(button),
                    WorldPosition {
                        pos: pos + Vec3::new(0.0, 0.0, LABEL_OFFSET),
                    },
                    Extent::new(0.225, 0.225, 0.005),
                    PuzzleOwned { session },
                ));
            }
        }
        PuzzleKind::Pattern => {
            for (index, (x, z)) in TILE_SPOTS.into_iter().enumerate() {
                world.spawn((
                    Interactable::PatternTile { index },
                    WorldPosition {
                        pos: at(x, TILE_HEIGHT, z),
                    },
                    Extent::new(0.4, 0.4, 0.05),
                    Emissive::new(TILE_COLORS[index], TILE_IDLE),
                    PuzzleOwned { session },
                ));
            }
            world
                .resource_mut::<Scheduler>()
                .schedule(0.0, TimedTask::PatternReplayStart { session });
        }
        PuzzleKind::Hidden => {
            for (index, (x, y, z)) in ITEM_SPOTS.into_iter().enumerate() {
                let rate = random_spin_rate(&mut world.resource_mut::<GameRng>().0);
                world.spawn(crystal(
                    Interactable::CollectibleItem { index },
                    at(x, y, z),
                    session,
                    rate,
                ));
            }
        }
        PuzzleKind::None => return session,
    }

    let (answer, intro) = {
        let puzzle = world.resource::<PuzzleSession>();
        (puzzle.answer_text(), puzzle.intro_message())
    };
    world.spawn((
        Decoration::AnswerBoard { text: answer },
        WorldPosition {
            pos: layout.to_world(room, BOARD_SPOT),
        },
        Extent::new(1.5, 1.5, 0.05).turned(),
        Rotation::from_yaw(-FRAC_PI_2),
        PuzzleOwned { session },
    ));
    world.spawn((
        Decoration::SpotLight,
        WorldPosition {
            pos: layout.to_world(room, SPOTLIGHT_SPOT),
        },
        PuzzleOwned { session },
    ));

    if let Some((text, duration_ms)) = intro {
        push_hud(world, HudCmd::message(text, duration_ms));
    }
    push_hud(world, HudCmd::log(Vec::new(), kind.log_title()));
    info!("room {room}: {:?} puzzle spawned (session {session})", kind);
    session
}

/// Golden crystal bundle shared by the hidden-object puzzle and the bonus
/// collection.
fn crystal(kind: Interactable, pos: Vec3, session: u64, spin_rate: f32) -> impl Bundle {
    (
        kind,
        WorldPosition { pos },
        Extent::cube(ITEM_HALF),
        ITEM_GLOW,
        Rotation::default(),
        Spin {
            yaw_rate: spin_rate,
            pitch_rate: spin_rate * 0.5,
        },
        PuzzleOwned { session },
    )
}

/// 0.6 to 1.8 rad/s.
fn random_spin_rate(rng: &mut fastrand::Rng) -> f32 {
    0.6 + rng.f32() * 1.2
}

/// Handles an interact press on a puzzle element.
///
/// Elements left over from an older session are ignored.
pub fn dispatch_puzzle_interaction(
    ctx: &mut InteractionContext,
    entity: Entity,
    kind: Interactable,
    owned: Option<PuzzleOwned>,
) {
    let Some(owned) = owned else {
        debug!("{:?} has no owning puzzle", entity);
        return;
    };
    if owned.session != ctx.puzzle.id() {
        warn!(
            "stale puzzle element {:?} from session {} (live {})",
            entity,
            owned.session,
            ctx.puzzle.id()
        );
        return;
    }
    match kind {
        Interactable::ColorOrb { color } => press_orb(ctx, entity, color),
        Interactable::NumberButton { digit } => press_button(ctx, entity, digit),
        Interactable::PatternTile { index } => touch_tile(ctx, entity, index),
        Interactable::CollectibleItem { index } => take_item(ctx, entity, index),
        Interactable::BonusCrystal { index } => take_crystal(ctx, entity, index),
        _ => {}
    }
}

fn press_orb(ctx: &mut InteractionContext, entity: Entity, color: OrbColor) {
    let outcome = ctx.puzzle.submit(PuzzleToken::Color(color));
    if outcome == SubmitOutcome::Ignored {
        return;
    }
    ctx.flash(entity, Emissive::new(color.rgb(), ORB_FLASH));
    ctx.scheduler.schedule(
        ORB_FLASH_TIME,
        TimedTask::SetEmissive {
            entity,
            emissive: Emissive::new(color.rgb(), ORB_IDLE),
        },
    );
    let title = PuzzleKind::Color.log_title();
    match outcome {
        SubmitOutcome::Progress { .. } => {
            ctx.hud.write(HudCmd::log(ctx.puzzle.player_labels(), title));
            ctx.hud.write(HudCmd::message(color.name(), 800));
        }
        SubmitOutcome::Wrong { .. } => {
            ctx.audio.write(AudioCue::Failure);
            ctx.hud.write(HudCmd::log(Vec::new(), title));
            ctx.hud.write(HudCmd::message(color.name(), 800));
        }
        SubmitOutcome::BonusStarted { total } => start_bonus(ctx, total),
        SubmitOutcome::Completed => complete_puzzle(ctx),
        _ => {}
    }
}

fn press_button(ctx: &mut InteractionContext, entity: Entity, digit: u8) {
    let outcome = ctx.puzzle.submit(PuzzleToken::Digit(digit));
    if outcome == SubmitOutcome::Ignored {
        return;
    }
    ctx.flash(entity, BUTTON_PRESS);
    ctx.scheduler.schedule(
        BUTTON_PRESS_TIME,
        TimedTask::SetEmissive {
            entity,
            emissive: Emissive::OFF,
        },
    );
    let title = PuzzleKind::Number.log_title();
    match outcome {
        SubmitOutcome::Progress { .. } => {
            let entered = ctx.puzzle.player_labels();
            ctx.hud
                .write(HudCmd::message(format!("Entered: {}", entered.concat()), 1000));
            ctx.hud.write(HudCmd::log(entered, title));
        }
        SubmitOutcome::Wrong {
            rejected,
            attempts_left,
            exhausted,
        } => {
            let code: Vec<String> = rejected.iter().map(PuzzleToken::label).collect();
            ctx.hud.write(HudCmd::log(code.clone(), title));
            ctx.audio.write(AudioCue::Failure);

            let session = ctx.puzzle.id();
            let buttons: SmallVec<[Entity; 10]> = ctx
                .interactables
                .iter()
                .filter(|(_, kind, owned)| {
                    matches!(kind, Interactable::NumberButton { .. })
                        && owned.is_some_and(|owned| owned.session == session)
                })
                .map(|(button, _, _)| button)
                .collect();
            for button in buttons {
                ctx.flash(button, BUTTON_WRONG);
                ctx.scheduler.schedule(
                    BUTTON_WRONG_TIME,
                    TimedTask::SetEmissive {
                        entity: button,
                        emissive: Emissive::OFF,
                    },
                );
            }

            let text = if exhausted {
                "✗ Puzzle failed! Restarting...".to_string()
            } else {
                format!(
                    "✗ Wrong code ({})! {attempts_left} attempts remaining",
                    code.concat()
                )
            };
            ctx.hud.write(HudCmd::message(text, 2000));
        }
        SubmitOutcome::Completed => complete_puzzle(ctx),
        _ => {}
    }
}

fn touch_tile(ctx: &mut InteractionContext, entity: Entity, index: usize) {
    let outcome = ctx.puzzle.submit(PuzzleToken::Tile(index));
    if outcome == SubmitOutcome::Ignored {
        return;
    }
    let color = TILE_COLORS.get(index).copied().unwrap_or_default();
    ctx.flash(entity, Emissive::new(color, TILE_TOUCH));
    ctx.scheduler.schedule(
        TILE_TOUCH_TIME,
        TimedTask::SetEmissive {
            entity,
            emissive: Emissive::new(color, TILE_IDLE),
        },
    );
    let title = PuzzleKind::Pattern.log_title();
    match outcome {
        SubmitOutcome::Progress { .. } => {
            ctx.hud.write(HudCmd::log(ctx.puzzle.player_labels(), title));
        }
        SubmitOutcome::Wrong {
            attempts_left,
            exhausted,
            ..
        } => {
            ctx.audio.write(AudioCue::Failure);
            ctx.hud.write(HudCmd::log(Vec::new(), title));
            let text = if exhausted {
                "✗ Puzzle failed! Restarting...".to_string()
            } else {
                format!("✗ Wrong! Watch again. {attempts_left} attempts remaining")
            };
            ctx.hud.write(HudCmd::message(text, 2000));
            let session = ctx.puzzle.id();
            ctx.scheduler
                .schedule(PATTERN_RETRY_DELAY, TimedTask::PatternReplayStart { session });
        }
        SubmitOutcome::Completed => complete_puzzle(ctx),
        _ => {}
    }
}

fn take_item(ctx: &mut InteractionContext, entity: Entity, index: usize) {
    let outcome = ctx.puzzle.submit(PuzzleToken::Item(index));
    if outcome == SubmitOutcome::Ignored {
        return;
    }
    ctx.despawn(entity);
    let (found, total) = (ctx.puzzle.found_items(), ctx.puzzle.total_items());
    ctx.hud.write(HudCmd::log(
        vec![format!("{found}/{total}")],
        PuzzleKind::Hidden.log_title(),
    ));
    ctx.hud
        .write(HudCmd::message(format!("🔍 Found {found}/{total}!"), 1000));
    if outcome == SubmitOutcome::Completed {
        complete_puzzle(ctx);
    }
}

fn start_bonus(ctx: &mut InteractionContext, total: u32) {
    let room = ctx.run.current_room();
    let session = ctx.puzzle.id();
    for index in 0..total as usize {
        let (x, y, z) = ITEM_SPOTS[index % ITEM_SPOTS.len()];
        let pos = ctx.layout.to_world(room, Vec3::new(x, y, z));
        let rate = random_spin_rate(&mut ctx.rng.0);
        ctx.commands.spawn(crystal(
            Interactable::BonusCrystal { index },
            pos,
            session,
            rate,
        ));
    }
    ctx.hud
        .write(HudCmd::log(vec![format!("0/{total}")], "Crystals found"));
    ctx.hud.write(HudCmd::message(
        format!("✅ Colors correct! Collect crystals (0/{total})"),
        2000,
    ));
    info!("room {room}: bonus collection of {total} crystals started");
}

fn take_crystal(ctx: &mut InteractionContext, entity: Entity, index: usize) {
    let outcome = ctx.puzzle.collect_bonus(index);
    let (collected, total) = match outcome {
        SubmitOutcome::BonusProgress { collected, total } => (collected, total),
        SubmitOutcome::Completed => ctx
            .puzzle
            .bonus()
            .map_or((0, 0), |bonus| (bonus.collected, bonus.total)),
        _ => return,
    };
    ctx.despawn(entity);
    ctx.hud.write(HudCmd::log(
        vec![format!("{collected}/{total}")],
        "Crystals found",
    ));
    ctx.hud
        .write(HudCmd::message(format!("💎 Crystals {collected}/{total}"), 1000));
    if outcome == SubmitOutcome::Completed {
        complete_puzzle(ctx);
    }
}

/// Marks the room's puzzle solved, clears its objects and asks for keys.
fn complete_puzzle(ctx: &mut InteractionContext) {
    let room = ctx.run.current_room();
    let session = ctx.puzzle.id();
    ctx.run.mark_puzzle_solved();
    ctx.audio.write(AudioCue::Success);

    let leftovers: SmallVec<[Entity; 32]> = ctx
        .owned
        .iter()
        .filter(|(_, owned, decoration)| {
            owned.session == session
                && !decoration.is_some_and(Decoration::survives_puzzle_cleanup)
        })
        .map(|(entity, _, _)| entity)
        .collect();
    for entity in leftovers {
        ctx.despawn(entity);
    }

    ctx.hud.write(HudCmd::message(
        "🎉 Puzzle solved! The key has appeared!",
        3000,
    ));
    ctx.hud.write(HudCmd::ClearInteractionLog);
    ctx.commands.trigger(PuzzleSolvedEvent { room, session });
    ctx.signals.write(GameSignal::PuzzleSolved { room });
    info!("room {room}: puzzle solved (session {session})");
}

/// Starts showing the pattern of `session`, one tile at a time.
pub fn start_pattern_replay(world: &mut World, session: u64) {
    let steps = {
        let mut puzzle = world.resource_mut::<PuzzleSession>();
        if !puzzle.begin_presentation(session) {
            debug!("pattern replay for session {session} skipped");
            return;
        }
        puzzle.target().len()
    };
    push_hud(world, HudCmd::message("👀 Watch the pattern...", 1000));
    let mut scheduler = world.resource_mut::<Scheduler>();
    for step in 0..steps {
        scheduler.schedule(
            step as f32 * PATTERN_STEP_INTERVAL,
            TimedTask::PatternStep { session, step },
        );
    }
    scheduler.schedule(
        steps as f32 * PATTERN_STEP_INTERVAL + PATTERN_TAIL,
        TimedTask::PatternReplayFinished { session },
    );
}

/// Lights the tile at position `step` of the pattern.
pub fn light_pattern_step(world: &mut World, session: u64, step: usize) {
    let tile = {
        let puzzle = world.resource::<PuzzleSession>();
        if puzzle.id() != session || !puzzle.is_presenting() {
            return;
        }
        match puzzle.target().get(step) {
            Some(PuzzleToken::Tile(index)) => *index,
            _ => return,
        }
    };
    let mut tiles = world.query::<(Entity, &Interactable, &PuzzleOwned)>();
    let found = tiles
        .iter(world)
        .find(|(_, kind, owned)| {
            owned.session == session
                && matches!(kind, Interactable::PatternTile { index } if *index == tile)
        })
        .map(|(entity, _, _)| entity);
    let Some(entity) = found else {
        return;
    };
    let color = TILE_COLORS.get(tile).copied().unwrap_or_default();
    if let Some(mut emissive) = world.get_mut::<Emissive>(entity) {
        *emissive = Emissive::new(color, TILE_REPLAY);
    }
    world.resource_mut::<Scheduler>().schedule(
        TILE_REPLAY_TIME,
        TimedTask::SetEmissive {
            entity,
            emissive: Emissive::new(color, TILE_IDLE),
        },
    );
}

/// Ends the replay and opens input.
pub fn finish_pattern_replay(world: &mut World, session: u64) {
    if world
        .resource_mut::<PuzzleSession>()
        .finish_presentation(session)
    {
        push_hud(world, HudCmd::message("Now repeat the pattern!", 2000));
    }
}
