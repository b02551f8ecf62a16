//! Interactable entity kinds.
//!
//! Every entity the player can target and act on carries an [`Interactable`]
//! component. The variant says what the entity is and carries its payload
//! (the orb color, the keypad digit, the tile index...), so dispatch matches
//! on the variant instead of comparing entity names.
//!
//! Puzzle elements additionally carry a
//! [`PuzzleOwned`](crate::components::puzzleowned::PuzzleOwned) back-reference
//! to the puzzle session that spawned them.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// The four orb colors used by the color puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl OrbColor {
    /// Orb colors in spawn order.
    pub const ALL: [OrbColor; 4] = [OrbColor::Red, OrbColor::Blue, OrbColor::Green, OrbColor::Yellow];

    pub fn name(self) -> &'static str {
        match self {
            OrbColor::Red => "RED",
            OrbColor::Blue => "BLUE",
            OrbColor::Green => "GREEN",
            OrbColor::Yellow => "YELLOW",
        }
    }

    pub fn rgb(self) -> u32 {
        match self {
            OrbColor::Red => 0xff0000,
            OrbColor::Blue => 0x0000ff,
            OrbColor::Green => 0x00ff00,
            OrbColor::Yellow => 0xffff00,
        }
    }
}

/// Tile names for the pattern puzzle, indexed by tile index.
pub const TILE_NAMES: [&str; 4] = ["RED", "GREEN", "BLUE", "YELLOW"];

/// Tile colors for the pattern puzzle, indexed by tile index.
pub const TILE_COLORS: [u32; 4] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00];

/// Name of a pattern tile, or its index when out of range.
pub fn tile_name(index: usize) -> String {
    TILE_NAMES
        .get(index)
        .map(|name| (*name).to_string())
        .unwrap_or_else(|| index.to_string())
}

/// What an interactable entity is.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interactable {
    /// Color puzzle orb.
    ColorOrb { color: OrbColor },
    /// Keypad button of the number puzzle.
    NumberButton { digit: u8 },
    /// Memory tile of the pattern puzzle.
    PatternTile { index: usize },
    /// Crystal of the hidden-object puzzle.
    CollectibleItem { index: usize },
    /// Crystal of a bonus collection round.
    BonusCrystal { index: usize },
    /// Key spawned once the room's puzzle is solved.
    Key { index: usize },
    /// The room's exit door.
    Door,
    /// Decorative chest; only shows a flavor message.
    Chest,
}

impl Interactable {
    /// Categories reachable by the centerscreen raycast.
    pub fn is_puzzle_element(&self) -> bool {
        matches!(
            self,
            Interactable::ColorOrb { .. }
                | Interactable::NumberButton { .. }
                | Interactable::PatternTile { .. }
        )
    }

    /// Categories reachable by the proximity scan.
    pub fn is_proximity_target(&self) -> bool {
        matches!(
            self,
            Interactable::Key { .. }
                | Interactable::Door
                | Interactable::Chest
                | Interactable::CollectibleItem { .. }
                | Interactable::BonusCrystal { .. }
        )
    }

    /// Advisory prompt shown while this entity is targeted.
    pub fn prompt(&self, door_open: bool, door_unlockable: bool) -> String {
        match self {
            Interactable::NumberButton { digit } => format!("[E] Press number {digit}"),
            Interactable::ColorOrb { .. } => "[E] Touch the colored orb".to_string(),
            Interactable::PatternTile { .. } => "[E] Touch the sample tile".to_string(),
            Interactable::Door if door_open => "🚪 [E] ENTER NEXT ROOM".to_string(),
            Interactable::Door if door_unlockable => "🔓 [E] OPEN DOOR".to_string(),
            Interactable::Door => "🔒 Door is locked - solve puzzle to open".to_string(),
            Interactable::Key { .. } => "🗝️ [E] PICK UP KEY".to_string(),
            Interactable::CollectibleItem { .. } | Interactable::BonusCrystal { .. } => {
                "💎 [E] COLLECT CRYSTAL".to_string()
            }
            Interactable::Chest => "[E] Interact".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raycast_and_proximity_categories_are_disjoint() {
        let all = [
            Interactable::ColorOrb { color: OrbColor::Red },
            Interactable::NumberButton { digit: 3 },
            Interactable::PatternTile { index: 1 },
            Interactable::CollectibleItem { index: 0 },
            Interactable::BonusCrystal { index: 0 },
            Interactable::Key { index: 0 },
            Interactable::Door,
            Interactable::Chest,
        ];
        for kind in all {
            assert_ne!(kind.is_puzzle_element(), kind.is_proximity_target(), "{kind:?}");
        }
    }

    #[test]
    fn door_prompt_depends_on_state() {
        assert!(Interactable::Door.prompt(true, true).contains("ENTER"));
        assert!(Interactable::Door.prompt(false, true).contains("OPEN"));
        assert!(Interactable::Door.prompt(false, false).contains("locked"));
    }

    #[test]
    fn tile_name_falls_back_to_index() {
        assert_eq!(tile_name(2), "BLUE");
        assert_eq!(tile_name(9), "9");
    }
}
