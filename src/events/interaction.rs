use bevy_ecs::prelude::*;

/// The player pressed interact while `entity` was targeted.
#[derive(Event, Debug, Clone, Copy)]
pub struct InteractEvent {
    pub entity: Entity,
}
