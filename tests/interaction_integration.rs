//! Interaction integration tests: targeting, highlight bookkeeping, the
//! advisory prompt and interaction routing for non-puzzle objects.

use bevy_ecs::prelude::*;
use glam::Vec3;
use tempfile::TempDir;

use escaperoom::autoplay::{aim_at, standoff_for, token_matches};
use escaperoom::components::decoration::Decoration;
use escaperoom::components::emissive::Emissive;
use escaperoom::components::interactable::{Interactable, OrbColor};
use escaperoom::components::puzzleowned::PuzzleOwned;
use escaperoom::components::worldposition::{Extent, WorldPosition};
use escaperoom::events::audio::AudioCue;
use escaperoom::events::hud::HudCmd;
use escaperoom::game::Game;
use escaperoom::resources::door::DoorPhase;
use escaperoom::resources::gameconfig::GameConfig;
use escaperoom::resources::puzzle::PuzzleToken;
use escaperoom::resources::roomcatalog::FurnitureKind;
use escaperoom::resources::roomlayout::EYE_HEIGHT;

const FRAME: f32 = 1.0 / 60.0;

fn make_config(dir: &TempDir) -> GameConfig {
    let mut config = GameConfig::new();
    config.seed = Some(7);
    config.save_path = dir.path().join("savepoint.json");
    config.antagonist_start_room = 99;
    config
}

fn make_game(config: GameConfig, room: u32) -> Game {
    let mut game = Game::new(config);
    game.start_at(room).unwrap();
    game
}

fn run_for(game: &mut Game, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as u32;
    for _ in 0..frames {
        game.tick(FRAME);
    }
}

fn find_element(game: &mut Game, pred: impl Fn(&Interactable) -> bool) -> Entity {
    let world = game.world_mut();
    let mut query = world.query::<(Entity, &Interactable)>();
    query
        .iter(world)
        .find(|(_, kind)| pred(kind))
        .map(|(entity, _)| entity)
        .unwrap()
}

fn orb(game: &mut Game, color: OrbColor) -> Entity {
    find_element(game, |k| *k == Interactable::ColorOrb { color })
}

fn position(game: &Game, entity: Entity) -> Vec3 {
    game.world().get::<WorldPosition>(entity).unwrap().pos
}

fn emissive(game: &Game, entity: Entity) -> Emissive {
    *game.world().get::<Emissive>(entity).unwrap()
}

fn room_center(game: &Game) -> Vec3 {
    let origin = game.layout().origin_of(game.run_state().current_room());
    Vec3::new(origin.x, EYE_HEIGHT, origin.z)
}

/// Stands in the middle of the room and looks at `target`.
fn look_from_center(game: &mut Game, target: Vec3) {
    let center = room_center(game);
    game.set_player_view(center, target - center);
    game.tick(FRAME);
}

fn press_on(game: &mut Game, entity: Entity) {
    let kind = *game.world().get::<Interactable>(entity).unwrap();
    let pos = position(game, entity);
    aim_at(game, pos, standoff_for(&kind));
    game.press_interact();
    game.tick(FRAME);
}

fn highlighted_count(game: &mut Game) -> usize {
    let world = game.world_mut();
    world
        .query::<&Emissive>()
        .iter(world)
        .filter(|e| **e == Emissive::HIGHLIGHT)
        .count()
}

#[test]
fn highlight_follows_the_target_and_restores_the_previous_one() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let red = orb(&mut game, OrbColor::Red);
    let blue = orb(&mut game, OrbColor::Blue);

    let red_pos = position(&game, red);
    look_from_center(&mut game, red_pos);
    assert_eq!(game.targeted(), Some(red));
    assert_eq!(emissive(&game, red), Emissive::HIGHLIGHT);

    let blue_pos = position(&game, blue);
    look_from_center(&mut game, blue_pos);
    assert_eq!(game.targeted(), Some(blue));
    assert_eq!(emissive(&game, blue), Emissive::HIGHLIGHT);
    assert_eq!(emissive(&game, red), Emissive::new(OrbColor::Red.rgb(), 0.5));
    assert_eq!(highlighted_count(&mut game), 1);
}

#[test]
fn prompt_is_sent_only_when_it_changes() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let green = orb(&mut game, OrbColor::Green);
    game.drain_hud();

    let green_pos = position(&game, green);
    look_from_center(&mut game, green_pos);
    assert!(game.drain_hud().contains(&HudCmd::ShowPrompt {
        text: "[E] Touch the colored orb".to_string()
    }));

    game.tick(FRAME);
    let repeated = game
        .drain_hud()
        .into_iter()
        .any(|cmd| matches!(cmd, HudCmd::ShowPrompt { .. }));
    assert!(!repeated);

    // Nothing above the player has a hit box and nothing is close enough.
    let center = room_center(&game);
    game.set_player_view(center, Vec3::Y);
    game.tick(FRAME);
    assert_eq!(game.targeted(), None);
    assert!(game.drain_hud().contains(&HudCmd::ClearPrompt));
    assert_eq!(highlighted_count(&mut game), 0);
}

#[test]
fn puzzle_elements_beyond_ray_range_are_not_targeted() {
    let dir = TempDir::new().unwrap();
    let mut config = make_config(&dir);
    config.max_raycast_distance = 5.0;
    let mut game = make_game(config, 1);
    let yellow = orb(&mut game, OrbColor::Yellow);

    let yellow_pos = position(&game, yellow);
    look_from_center(&mut game, yellow_pos);
    assert_eq!(game.targeted(), None);
}

#[test]
fn ray_passes_over_furniture_and_the_answer_board() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let red = orb(&mut game, OrbColor::Red);
    let target = position(&game, red);
    let center = room_center(&game);
    assert!(center.distance(target) < game.config().max_raycast_distance);
    let midway = (center + target) / 2.0;

    let board = game
        .world_mut()
        .spawn((
            Decoration::AnswerBoard {
                text: String::new(),
            },
            WorldPosition { pos: midway },
            Extent::cube(0.5),
        ))
        .id();
    look_from_center(&mut game, target);
    assert_eq!(game.targeted(), Some(red));

    game.world_mut().despawn(board);
    game.world_mut().spawn((
        Decoration::Furniture {
            kind: FurnitureKind::Table,
        },
        WorldPosition { pos: midway },
        Extent::cube(0.5),
    ));
    look_from_center(&mut game, target);
    assert_eq!(game.targeted(), Some(red));
}

#[test]
fn range_limit_still_applies_past_furniture() {
    let dir = TempDir::new().unwrap();
    let mut config = make_config(&dir);
    config.max_raycast_distance = 3.0;
    let mut game = make_game(config, 1);
    let red = orb(&mut game, OrbColor::Red);
    let target = position(&game, red);
    let center = room_center(&game);
    assert!(center.distance(target) > 3.0);
    game.world_mut().spawn((
        Decoration::Furniture {
            kind: FurnitureKind::Table,
        },
        WorldPosition {
            pos: center + (target - center).normalize() * 1.5,
        },
        Extent::cube(0.5),
    ));

    look_from_center(&mut game, target);
    assert_ne!(game.targeted(), Some(red));
}

#[test]
fn keypad_labels_resolve_to_their_button() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 2);
    let five = find_element(&mut game, |k| *k == Interactable::NumberButton { digit: 5 });

    let five_pos = position(&game, five);
    aim_at(&mut game, five_pos, 1.5);
    game.tick(FRAME);
    assert_eq!(game.targeted(), Some(five));

    game.press_interact();
    game.tick(FRAME);
    assert_eq!(game.puzzle().player_sequence(), &[PuzzleToken::Digit(5)]);
}

#[test]
fn nearby_chest_is_targeted_by_proximity() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let chest = find_element(&mut game, |k| *k == Interactable::Chest);
    game.drain_hud();

    let chest_pos = position(&game, chest);
    aim_at(&mut game, chest_pos, 1.0);
    game.tick(FRAME);
    assert_eq!(game.targeted(), Some(chest));

    game.press_interact();
    game.tick(FRAME);
    assert!(game.drain_hud().contains(&HudCmd::message("Empty chest...", 2000)));
}

#[test]
fn flash_on_a_highlighted_orb_reverts_to_the_highlight() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let first = game.puzzle().target()[0];
    let entity = find_element(&mut game, |k| token_matches(first, k));
    let PuzzleToken::Color(color) = first else {
        panic!("color room expected");
    };

    press_on(&mut game, entity);
    assert_eq!(emissive(&game, entity), Emissive::new(color.rgb(), 1.5));

    run_for(&mut game, 0.3);
    assert_eq!(game.targeted(), Some(entity));
    assert_eq!(emissive(&game, entity), Emissive::HIGHLIGHT);

    let center = room_center(&game);
    game.set_player_view(center, Vec3::Y);
    game.tick(FRAME);
    assert_eq!(emissive(&game, entity), Emissive::new(color.rgb(), 0.5));
}

#[test]
fn elements_of_an_old_session_are_ignored() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    let first = game.puzzle().target()[0];
    let entity = find_element(&mut game, |k| token_matches(first, k));
    let stale = game.puzzle().id() + 100;
    game.world_mut()
        .entity_mut(entity)
        .insert(PuzzleOwned { session: stale });

    press_on(&mut game, entity);
    assert!(game.puzzle().player_sequence().is_empty());
}

#[test]
fn collecting_the_key_unlocks_the_door() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(make_config(&dir), 1);
    for token in game.puzzle().target().to_vec() {
        let entity = find_element(&mut game, |k| token_matches(token, k));
        press_on(&mut game, entity);
    }
    assert!(game.run_state().puzzle_solved());
    assert_eq!(game.door().phase(), DoorPhase::Locked);
    game.drain_audio();
    game.drain_hud();

    let key = find_element(&mut game, |k| matches!(k, Interactable::Key { .. }));
    press_on(&mut game, key);

    assert!(game.world().get_entity(key).is_err());
    assert_eq!(game.run_state().keys_collected(), 1);
    assert!(game.run_state().door_unlockable());
    assert_eq!(game.door().phase(), DoorPhase::Unlockable);
    assert!(game.drain_audio().contains(&AudioCue::Pickup));
    assert!(game
        .drain_hud()
        .contains(&HudCmd::message("Collected enough keys! (1/1)", 2000)));

    game.tick(FRAME);
    assert_ne!(game.targeted(), Some(key));
}
