//! Puzzle flow integration tests: every puzzle kind driven through the
//! `Game` facade with real targeting and interact presses.

use bevy_ecs::prelude::*;
use tempfile::TempDir;

use escaperoom::autoplay::{aim_at, standoff_for, token_matches};
use escaperoom::components::interactable::{Interactable, OrbColor};
use escaperoom::components::worldposition::WorldPosition;
use escaperoom::events::audio::AudioCue;
use escaperoom::events::flow::GameSignal;
use escaperoom::events::hud::HudCmd;
use escaperoom::game::Game;
use escaperoom::resources::gameconfig::GameConfig;
use escaperoom::resources::puzzle::{PuzzleKind, PuzzleToken};

const FRAME: f32 = 1.0 / 60.0;

fn make_config(dir: &TempDir) -> GameConfig {
    let mut config = GameConfig::new();
    config.seed = Some(42);
    config.save_path = dir.path().join("savepoint.json");
    config.antagonist_start_room = 99;
    config
}

fn make_game(dir: &TempDir, room: u32) -> Game {
    let mut game = Game::new(make_config(dir));
    game.start_at(room).unwrap();
    game
}

fn run_for(game: &mut Game, seconds: f32) {
    let frames = (seconds / FRAME).ceil() as u32;
    for _ in 0..frames {
        game.tick(FRAME);
    }
}

fn find_element(game: &mut Game, pred: impl Fn(&Interactable) -> bool) -> Option<Entity> {
    let world = game.world_mut();
    let mut query = world.query::<(Entity, &Interactable)>();
    query
        .iter(world)
        .find(|(_, kind)| pred(kind))
        .map(|(entity, _)| entity)
}

fn all_elements(game: &mut Game, pred: impl Fn(&Interactable) -> bool) -> Vec<Entity> {
    let world = game.world_mut();
    let mut query = world.query::<(Entity, &Interactable)>();
    query
        .iter(world)
        .filter(|(_, kind)| pred(kind))
        .map(|(entity, _)| entity)
        .collect()
}

/// Aims at `entity` the way a player would and presses interact once.
fn press_on(game: &mut Game, entity: Entity) {
    let kind = *game.world().get::<Interactable>(entity).unwrap();
    let pos = game.world().get::<WorldPosition>(entity).unwrap().pos;
    aim_at(game, pos, standoff_for(&kind));
    game.press_interact();
    game.tick(FRAME);
}

fn press_token(game: &mut Game, token: PuzzleToken) {
    let entity = find_element(game, |k| token_matches(token, k)).unwrap();
    press_on(game, entity);
}

fn is_key(kind: &Interactable) -> bool {
    matches!(kind, Interactable::Key { .. })
}

fn has_message(hud: &[HudCmd], text: &str) -> bool {
    hud.iter().any(|cmd| match cmd {
        HudCmd::ShowMessage { text: shown, .. } => shown == text,
        _ => false,
    })
}

#[test]
fn color_sequence_in_order_solves_the_room() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 1);
    assert_eq!(game.puzzle().kind(), PuzzleKind::Color);

    let target = game.puzzle().target().to_vec();
    assert_eq!(target.len(), 5);
    for token in target {
        press_token(&mut game, token);
    }

    assert!(game.puzzle().is_completed());
    assert!(game.run_state().puzzle_solved());
    assert_eq!(all_elements(&mut game, is_key).len(), 1);
    assert!(all_elements(&mut game, |k| matches!(k, Interactable::ColorOrb { .. })).is_empty());
    assert!(game.drain_audio().contains(&AudioCue::Success));
    assert!(game
        .drain_signals()
        .contains(&GameSignal::PuzzleSolved { room: 1 }));
}

#[test]
fn wrong_color_sequence_costs_one_attempt_and_clears_input() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 1);
    let target = game.puzzle().target().to_vec();
    let wrong = OrbColor::ALL
        .into_iter()
        .map(PuzzleToken::Color)
        .find(|token| *token != target[0])
        .unwrap();

    press_token(&mut game, wrong);
    for token in &target[1..] {
        press_token(&mut game, *token);
    }

    assert_eq!(game.puzzle().attempts_remaining(), 2);
    assert!(game.puzzle().player_sequence().is_empty());
    assert!(!game.run_state().puzzle_solved());
    assert!(game.drain_audio().contains(&AudioCue::Failure));
}

#[test]
fn keypad_accepts_the_solved_equations() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 2);
    assert_eq!(game.puzzle().kind(), PuzzleKind::Number);

    let digits = game.puzzle().math().unwrap().digits();
    for digit in digits {
        assert!((1..=9).contains(&digit));
        press_token(&mut game, PuzzleToken::Digit(digit));
    }

    assert!(game.run_state().puzzle_solved());
    assert_eq!(all_elements(&mut game, is_key).len(), 1);
}

#[test]
fn exhausted_keypad_attempts_reset_without_ending_the_run() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 2);
    game.drain_hud();

    // Digits are 1..=9, so 0000 never matches.
    for _ in 0..4 {
        press_token(&mut game, PuzzleToken::Digit(0));
    }
    assert_eq!(game.puzzle().attempts_remaining(), 2);
    assert!(has_message(
        &game.drain_hud(),
        "✗ Wrong code (0000)! 2 attempts remaining"
    ));

    for _ in 0..8 {
        press_token(&mut game, PuzzleToken::Digit(0));
    }
    assert_eq!(game.puzzle().attempts_remaining(), 3);
    assert!(has_message(&game.drain_hud(), "✗ Puzzle failed! Restarting..."));
    assert!(!game.run_state().game_over());
    assert!(!game.run_state().puzzle_solved());
}

#[test]
fn pattern_input_opens_only_after_the_replay() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 3);
    assert_eq!(game.puzzle().kind(), PuzzleKind::Pattern);
    let target = game.puzzle().target().to_vec();

    press_token(&mut game, target[0]);
    assert!(game.puzzle().is_presenting());
    assert!(game.puzzle().player_sequence().is_empty());

    run_for(&mut game, 5.0);
    assert!(game.puzzle().accepts_input());
    assert!(has_message(&game.drain_hud(), "Now repeat the pattern!"));

    for token in target {
        press_token(&mut game, token);
    }
    assert!(game.run_state().puzzle_solved());
}

#[test]
fn wrong_pattern_is_replayed_after_a_delay() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 3);
    run_for(&mut game, 5.0);
    let target = game.puzzle().target().to_vec();
    let wrong = match target[0] {
        PuzzleToken::Tile(index) => PuzzleToken::Tile((index + 1) % 4),
        other => other,
    };

    press_token(&mut game, wrong);
    for token in &target[1..] {
        press_token(&mut game, *token);
    }
    assert_eq!(game.puzzle().attempts_remaining(), 2);
    assert!(!game.puzzle().accepts_input());

    run_for(&mut game, 1.0);
    assert!(!game.puzzle().is_presenting());
    run_for(&mut game, 1.5);
    assert!(game.puzzle().is_presenting());
    run_for(&mut game, 5.0);
    assert!(game.puzzle().accepts_input());
}

#[test]
fn hidden_items_can_be_collected_in_any_order() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 4);
    assert_eq!(game.puzzle().kind(), PuzzleKind::Hidden);

    let mut items = all_elements(&mut game, |k| matches!(k, Interactable::CollectibleItem { .. }));
    assert_eq!(items.len(), 5);
    items.reverse();
    for (taken, item) in items.into_iter().enumerate() {
        press_on(&mut game, item);
        assert!(game.world().get_entity(item).is_err());
        if taken < 4 {
            assert_eq!(game.puzzle().found_items(), taken + 1);
        }
    }

    assert!(game.run_state().puzzle_solved());
    assert_eq!(all_elements(&mut game, is_key).len(), 1);
}

#[test]
fn bonus_room_needs_every_crystal_after_the_colors() {
    let dir = TempDir::new().unwrap();
    let mut game = make_game(&dir, 5);
    assert_eq!(game.puzzle().kind(), PuzzleKind::Color);

    let target = game.puzzle().target().to_vec();
    for token in target {
        press_token(&mut game, token);
    }
    assert!(!game.run_state().puzzle_solved());
    assert_eq!(game.puzzle().bonus().map(|b| b.total), Some(5));

    let crystals = all_elements(&mut game, |k| matches!(k, Interactable::BonusCrystal { .. }));
    assert_eq!(crystals.len(), 5);
    for crystal in crystals {
        press_on(&mut game, crystal);
    }

    assert!(game.run_state().puzzle_solved());
    assert_eq!(all_elements(&mut game, is_key).len(), 1);
}
