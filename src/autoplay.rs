//! Scripted player for headless runs.
//!
//! [`AutoPlayer`] reads the live puzzle target out of the world, moves the
//! camera next to the next object to touch and presses interact. It knows
//! nothing the board in the room would not tell a human player, it just
//! reads it faster. Used by the CLI's `--autoplay` and by integration tests.
use glam::Vec3;
use log::debug;

use crate::components::interactable::Interactable;
use crate::components::puzzleowned::PuzzleOwned;
use crate::components::worldposition::WorldPosition;
use crate::game::Game;
use crate::resources::puzzle::{PuzzleKind, PuzzleToken};
use crate::resources::roomlayout::EYE_HEIGHT;

/// Seconds between two presses.
const PRESS_INTERVAL: f32 = 0.35;

/// Where to stand relative to an interactable, in meters along the line to
/// the room center. Positive is toward the center, negative away from it.
///
/// Raycast targets are faced from the room side. Pickups are approached
/// from the wall side so the view never starts inside a nearby orb.
pub fn standoff_for(kind: &Interactable) -> f32 {
    match kind {
        Interactable::Door => 0.8,
        kind if kind.is_puzzle_element() => 1.5,
        _ => -0.5,
    }
}

/// Moves the camera to `standoff` meters from `target` and looks at it.
pub fn aim_at(game: &mut Game, target: Vec3, standoff: f32) {
    let room = game.run_state().current_room();
    let origin = game.layout().origin_of(room);
    let mut toward_center = Vec3::new(origin.x - target.x, 0.0, origin.z - target.z);
    toward_center = toward_center.normalize_or_zero();
    if toward_center == Vec3::ZERO {
        toward_center = Vec3::Z;
    }
    let mut stand = target + toward_center * standoff;
    stand.y = EYE_HEIGHT;
    game.set_player_view(stand, target - stand);
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Goal {
    position: Vec3,
    standoff: f32,
}

#[derive(Debug, Clone, Default)]
pub struct AutoPlayer {
    cooldown: f32,
    presses: u32,
}

impl AutoPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interact presses issued so far.
    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Aims at the next goal and presses interact, at most once per
    /// interval. Call before [`Game::tick`].
    pub fn step(&mut self, game: &mut Game, delta: f32) {
        self.cooldown = (self.cooldown - delta).max(0.0);
        if self.cooldown > 0.0 {
            return;
        }
        let run = game.run_state();
        if !run.is_interactive() || run.transition_pending() {
            return;
        }
        let Some(goal) = next_goal(game) else {
            return;
        };
        aim_at(game, goal.position, goal.standoff);
        game.press_interact();
        self.presses += 1;
        self.cooldown = PRESS_INTERVAL;
        debug!("autoplay: press #{} aiming at {:?}", self.presses, goal.position);
    }
}

/// Interactable kind, position and owning session of one entity.
type Candidate = (Interactable, Vec3, Option<u64>);

fn next_goal(game: &mut Game) -> Option<Goal> {
    let session = game.puzzle().id();
    let kind = game.puzzle().kind();
    let accepts = game.puzzle().accepts_input();
    let next_token = game
        .puzzle()
        .target()
        .get(game.puzzle().player_sequence().len())
        .copied();
    let door_ready = game.run_state().door_unlockable();
    let door = game
        .layout()
        .door_world_position(game.run_state().current_room());

    let world = game.world_mut();
    let mut query = world.query::<(&Interactable, &WorldPosition, Option<&PuzzleOwned>)>();
    let candidates: Vec<Candidate> = query
        .iter(world)
        .map(|(kind, pos, owned)| (*kind, pos.pos, owned.map(|o| o.session)))
        .collect();

    if let Some(goal) = find_goal(&candidates, None, |k| matches!(k, Interactable::Key { .. })) {
        return Some(goal);
    }
    if door_ready {
        return Some(Goal {
            position: Vec3::new(door.x, 1.0, door.z),
            standoff: standoff_for(&Interactable::Door),
        });
    }
    let live = Some(session);
    if let Some(goal) = find_goal(&candidates, live, |k| {
        matches!(k, Interactable::BonusCrystal { .. })
    }) {
        return Some(goal);
    }
    if kind == PuzzleKind::Hidden {
        return find_goal(&candidates, live, |k| {
            matches!(k, Interactable::CollectibleItem { .. })
        });
    }
    if !accepts {
        return None;
    }
    let token = next_token?;
    find_goal(&candidates, live, |k| token_matches(token, k))
}

/// First candidate matching `pred`, restricted to `session` when given.
fn find_goal(
    candidates: &[Candidate],
    session: Option<u64>,
    pred: impl Fn(&Interactable) -> bool,
) -> Option<Goal> {
    candidates
        .iter()
        .find(|(kind, _, owner)| pred(kind) && (session.is_none() || *owner == session))
        .map(|(kind, pos, _)| Goal {
            position: *pos,
            standoff: standoff_for(kind),
        })
}

/// Whether pressing `kind` submits `token`.
pub fn token_matches(token: PuzzleToken, kind: &Interactable) -> bool {
    match (token, kind) {
        (PuzzleToken::Color(want), Interactable::ColorOrb { color }) => want == *color,
        (PuzzleToken::Digit(want), Interactable::NumberButton { digit }) => want == *digit,
        (PuzzleToken::Tile(want), Interactable::PatternTile { index }) => want == *index,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::interactable::OrbColor;

    #[test]
    fn tokens_match_their_element_only() {
        let orb = Interactable::ColorOrb {
            color: OrbColor::Blue,
        };
        assert!(token_matches(PuzzleToken::Color(OrbColor::Blue), &orb));
        assert!(!token_matches(PuzzleToken::Color(OrbColor::Red), &orb));
        assert!(!token_matches(
            PuzzleToken::Digit(3),
            &Interactable::PatternTile { index: 3 }
        ));
    }

    #[test]
    fn pickups_are_approached_from_the_wall_side() {
        assert!(standoff_for(&Interactable::Key { index: 0 }) < 0.0);
        assert!(standoff_for(&Interactable::NumberButton { digit: 1 }) > 1.0);
        assert!(standoff_for(&Interactable::Door) > 0.0);
    }
}
