//! Door panel animation.
//!
//! [`DoorState`] owns the swing; this system copies the resulting pose and
//! glow onto the [`DoorPanel`] entity the renderer draws and targeting sees.
use bevy_ecs::prelude::*;

use crate::components::emissive::Emissive;
use crate::components::roomscoped::DoorPanel;
use crate::components::rotation::Rotation;
use crate::components::worldposition::{Extent, WorldPosition};
use crate::resources::door::DoorState;
use crate::resources::targeting::Targeting;
use crate::resources::worldtime::WorldTime;

/// Swings an open door and keeps the panel in sync with [`DoorState`].
pub fn door_animation_system(
    time: Res<WorldTime>,
    mut door: ResMut<DoorState>,
    mut targeting: ResMut<Targeting>,
    mut panels: Query<(Entity, &mut WorldPosition, &mut Rotation, &mut Emissive), With<DoorPanel>>,
) {
    let pose = door.animate(time.delta);
    let glow = door.panel_emissive();
    for (entity, mut position, mut rotation, mut emissive) in panels.iter_mut() {
        if let Some(pose) = pose {
            position.pos = pose.position;
            rotation.yaw = pose.yaw;
        }
        if targeting.is_targeting(entity) {
            if targeting.saved != Some(glow) {
                targeting.saved = Some(glow);
            }
        } else if *emissive != glow {
            *emissive = glow;
        }
    }
}

/// Moves the panel to the closed pose of the door just set up.
pub fn place_door_panel(world: &mut World) {
    let (pose, extent, glow) = {
        let door = world.resource::<DoorState>();
        (door.pose(), door.closed_extent(), door.panel_emissive())
    };
    let mut panels = world.query_filtered::<(
        &mut WorldPosition,
        &mut Rotation,
        &mut Extent,
        &mut Emissive,
    ), With<DoorPanel>>();
    for (mut position, mut rotation, mut panel_extent, mut emissive) in panels.iter_mut(world) {
        position.pos = pose.position;
        *rotation = Rotation::from_yaw(pose.yaw);
        *panel_extent = extent;
        *emissive = glow;
    }
}
