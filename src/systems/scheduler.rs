//! Runs the timed tasks that came due this frame.
//!
//! [`run_scheduled_tasks`] is an exclusive system placed first in the update
//! schedule, so deferred effects land between frames and never in the middle
//! of input handling.
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::emissive::Emissive;
use crate::resources::scheduler::{Scheduler, TimedTask};
use crate::resources::targeting::Targeting;
use crate::resources::worldtime::WorldTime;
use crate::systems::gameflow::complete_transition;
use crate::systems::puzzle::{finish_pattern_replay, light_pattern_step, start_pattern_replay};

/// Advances the [`Scheduler`] by this frame's delta and executes due tasks in
/// order.
pub fn run_scheduled_tasks(world: &mut World) {
    let delta = world.resource::<WorldTime>().delta;
    let due = world.resource_mut::<Scheduler>().advance(delta);
    for task in due {
        debug!("scheduled task due: {:?}", task);
        match task {
            TimedTask::SetEmissive { entity, emissive } => restore_emissive(world, entity, emissive),
            TimedTask::PatternReplayStart { session } => start_pattern_replay(world, session),
            TimedTask::PatternStep { session, step } => light_pattern_step(world, session, step),
            TimedTask::PatternReplayFinished { session } => finish_pattern_replay(world, session),
            TimedTask::EnterNextRoom { from_room } => complete_transition(world, from_room),
        }
    }
}

/// Puts `emissive` back on `entity` after a flash.
///
/// A highlighted entity keeps showing the highlight; the value is stored as
/// the appearance to restore once targeting moves on.
pub fn restore_emissive(world: &mut World, entity: Entity, emissive: Emissive) {
    let targeted = world.resource::<Targeting>().is_targeting(entity);
    let Some(mut current) = world.get_mut::<Emissive>(entity) else {
        return;
    };
    if targeted {
        *current = Emissive::HIGHLIGHT;
        world.resource_mut::<Targeting>().saved = Some(emissive);
    } else {
        *current = emissive;
    }
}
