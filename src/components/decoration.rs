//! Non-interactive scene pieces the core still tracks.
//!
//! The renderer draws these; the core needs them for two reasons: the
//! raycast has to skip the answer board and its spot light, and room
//! teardown has to know what to remove.
use crate::resources::roomcatalog::FurnitureKind;
use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq)]
pub enum Decoration {
    /// Board showing the solution of the active puzzle.
    AnswerBoard { text: String },
    /// Light aimed at the answer board.
    SpotLight,
    /// Walls, floor and ceiling of a room.
    Shell { wall_color: u32, floor_color: u32 },
    Furniture { kind: FurnitureKind },
}

impl Decoration {
    /// Whether the centerscreen raycast passes through this decoration.
    pub fn skipped_by_raycast(&self) -> bool {
        matches!(self, Decoration::AnswerBoard { .. } | Decoration::SpotLight)
    }

    /// Whether puzzle completion leaves this decoration in place.
    pub fn survives_puzzle_cleanup(&self) -> bool {
        self.skipped_by_raycast()
    }
}
