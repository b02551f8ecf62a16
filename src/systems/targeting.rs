//! Interaction targeting.
//!
//! Each frame [`interaction_targeting_system`] picks the single entity the
//! next interact press applies to:
//!
//! 1. A centerscreen ray against every entity with an [`Extent`], answer
//!    board and spot lights excluded. Label parts resolve to the button they
//!    belong to. The nearest hit that is a puzzle element within
//!    `max_raycast_distance` wins; other hits along the ray are passed over.
//! 2. Otherwise the nearest proximity target (key, door, chest, crystal)
//!    within `max_interaction_distance` of the player.
//!
//! The chosen entity is highlighted and the previous one restored first, so
//! at most one highlight exists. The prompt for the target goes to the HUD
//! only when it changes.
use bevy_ecs::prelude::*;
use log::debug;
use smallvec::SmallVec;

use crate::components::decoration::Decoration;
use crate::components::emissive::Emissive;
use crate::components::interactable::Interactable;
use crate::components::puzzleowned::PartOf;
use crate::components::worldposition::{Extent, WorldPosition};
use crate::events::hud::HudCmd;
use crate::resources::door::DoorState;
use crate::resources::gameconfig::GameConfig;
use crate::resources::playerview::PlayerView;
use crate::resources::runstate::RunState;
use crate::resources::targeting::{TargetSource, Targeting};

type RayHits = SmallVec<[(f32, Entity); 16]>;

/// Updates [`Targeting`], the highlight and the advisory prompt.
#[allow(clippy::too_many_arguments)]
pub fn interaction_targeting_system(
    run: Res<RunState>,
    config: Res<GameConfig>,
    view: Res<PlayerView>,
    door: Res<DoorState>,
    mut targeting: ResMut<Targeting>,
    solids: Query<(Entity, &WorldPosition, &Extent, Option<&Decoration>, Option<&PartOf>)>,
    interactables: Query<(Entity, &Interactable, &WorldPosition)>,
    mut emissives: Query<&mut Emissive>,
    mut hud: MessageWriter<HudCmd>,
) {
    let found = if run.is_interactive() {
        raycast_target(&view, config.max_raycast_distance, &solids, &interactables)
            .map(|entity| (entity, TargetSource::Raycast))
            .or_else(|| {
                proximity_target(&view, config.max_interaction_distance, &interactables)
                    .map(|entity| (entity, TargetSource::Proximity))
            })
    } else {
        None
    };

    if found.map(|(entity, _)| entity) != targeting.current {
        if let (Some(previous), Some(saved)) = (targeting.current, targeting.saved) {
            if let Ok(mut emissive) = emissives.get_mut(previous) {
                *emissive = saved;
            }
        }
        targeting.forget();
        if let Some((entity, source)) = found {
            if let Ok(mut emissive) = emissives.get_mut(entity) {
                targeting.saved = Some(*emissive);
                *emissive = Emissive::HIGHLIGHT;
            }
            targeting.current = Some(entity);
            targeting.source = Some(source);
            debug!("targeting {:?} via {:?}", entity, source);
        }
    }

    let prompt = found
        .and_then(|(entity, _)| interactables.get(entity).ok())
        .map(|(_, kind, _)| kind.prompt(door.is_open(), run.door_unlockable()));
    if prompt != targeting.prompt {
        match &prompt {
            Some(text) => {
                hud.write(HudCmd::ShowPrompt { text: text.clone() });
            }
            None => {
                hud.write(HudCmd::ClearPrompt);
            }
        }
        targeting.prompt = prompt;
    }
}

fn raycast_target(
    view: &PlayerView,
    max_distance: f32,
    solids: &Query<(Entity, &WorldPosition, &Extent, Option<&Decoration>, Option<&PartOf>)>,
    interactables: &Query<(Entity, &Interactable, &WorldPosition)>,
) -> Option<Entity> {
    let dir = view.forward.normalize_or_zero();
    if dir == glam::Vec3::ZERO {
        return None;
    }
    let mut hits: RayHits = SmallVec::new();
    for (entity, position, extent, decoration, part_of) in solids.iter() {
        if decoration.is_some_and(Decoration::skipped_by_raycast) {
            continue;
        }
        if let Some(distance) = extent.ray_distance(position.pos, view.position, dir) {
            let owner = part_of.map_or(entity, |part| part.0);
            hits.push((distance, owner));
        }
    }
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.iter()
        .take_while(|(distance, _)| *distance <= max_distance)
        .find(|(_, entity)| {
            interactables
                .get(*entity)
                .is_ok_and(|(_, kind, _)| kind.is_puzzle_element())
        })
        .map(|&(_, entity)| entity)
}

fn proximity_target(
    view: &PlayerView,
    max_distance: f32,
    interactables: &Query<(Entity, &Interactable, &WorldPosition)>,
) -> Option<Entity> {
    let mut closest: Option<(f32, Entity)> = None;
    for (entity, kind, position) in interactables.iter() {
        if !kind.is_proximity_target() {
            continue;
        }
        let distance = view.position.distance(position.pos);
        if distance > max_distance {
            continue;
        }
        if closest.is_none_or(|(best, _)| distance < best) {
            closest = Some((distance, entity));
        }
    }
    closest.map(|(_, entity)| entity)
}
