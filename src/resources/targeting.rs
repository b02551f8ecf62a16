//! The single entity currently targeted by the player.
//!
//! Written every frame by
//! [`interaction_targeting_system`](crate::systems::targeting::interaction_targeting_system)
//! and read by the interact dispatch. At most one entity is highlighted at a
//! time; its original emissive is kept here so it can be restored.
use crate::components::emissive::Emissive;
use bevy_ecs::prelude::*;

/// How the target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetSource {
    Raycast,
    Proximity,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct Targeting {
    pub current: Option<Entity>,
    pub source: Option<TargetSource>,
    /// Emissive of `current` before the highlight was applied.
    pub saved: Option<Emissive>,
    /// Prompt last pushed to the HUD.
    pub prompt: Option<String>,
}

impl Targeting {
    /// Forgets the target without restoring anything (the entity is gone).
    pub fn forget(&mut self) {
        self.current = None;
        self.source = None;
        self.saved = None;
    }

    pub fn is_targeting(&self, entity: Entity) -> bool {
        self.current == Some(entity)
    }
}
