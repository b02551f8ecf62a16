//! Interact input and its dispatch.
//!
//! [`interact_input_system`] consumes the pending interact press and triggers
//! [`InteractEvent`] on the targeted entity. [`interact_observer`] routes it:
//! keys are collected, the door is opened or entered, chests show a flavor
//! message, and puzzle elements go to
//! [`dispatch_puzzle_interaction`](crate::systems::puzzle::dispatch_puzzle_interaction).
use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemParam;
use log::{debug, info};

use crate::components::decoration::Decoration;
use crate::components::emissive::Emissive;
use crate::components::interactable::Interactable;
use crate::components::puzzleowned::PuzzleOwned;
use crate::events::audio::AudioCue;
use crate::events::flow::{DoorEnteredEvent, GameSignal};
use crate::events::hud::HudCmd;
use crate::events::interaction::InteractEvent;
use crate::resources::door::DoorState;
use crate::resources::input::InputState;
use crate::resources::puzzle::PuzzleSession;
use crate::resources::rng::GameRng;
use crate::resources::roomcatalog::RoomCatalog;
use crate::resources::roomlayout::RoomLayout;
use crate::resources::runstate::RunState;
use crate::resources::scheduler::Scheduler;
use crate::resources::targeting::Targeting;
use crate::systems::puzzle::dispatch_puzzle_interaction;

/// Everything an interaction may read or change.
#[derive(SystemParam)]
pub struct InteractionContext<'w, 's> {
    pub commands: Commands<'w, 's>,
    pub run: ResMut<'w, RunState>,
    pub puzzle: ResMut<'w, PuzzleSession>,
    pub door: ResMut<'w, DoorState>,
    pub targeting: ResMut<'w, Targeting>,
    pub scheduler: ResMut<'w, Scheduler>,
    pub rng: ResMut<'w, GameRng>,
    pub layout: Res<'w, RoomLayout>,
    pub catalog: Res<'w, RoomCatalog>,
    pub interactables: Query<'w, 's, (Entity, &'static Interactable, Option<&'static PuzzleOwned>)>,
    pub owned: Query<'w, 's, (Entity, &'static PuzzleOwned, Option<&'static Decoration>)>,
    pub emissives: Query<'w, 's, &'static mut Emissive>,
    pub hud: MessageWriter<'w, HudCmd>,
    pub audio: MessageWriter<'w, AudioCue>,
    pub signals: MessageWriter<'w, GameSignal>,
}

impl InteractionContext<'_, '_> {
    /// Removes `entity` from the scene, dropping it from targeting first.
    pub fn despawn(&mut self, entity: Entity) {
        if self.targeting.is_targeting(entity) {
            self.targeting.forget();
        }
        self.commands.entity(entity).despawn();
    }

    /// Shows `emissive` on `entity` now. Used for flashes.
    pub fn flash(&mut self, entity: Entity, emissive: Emissive) {
        if let Ok(mut current) = self.emissives.get_mut(entity) {
            *current = emissive;
        }
    }
}

/// Turns an interact press into an [`InteractEvent`] on the current target.
pub fn interact_input_system(
    mut input: ResMut<InputState>,
    run: Res<RunState>,
    targeting: Res<Targeting>,
    mut commands: Commands,
) {
    if !input.take_interact() || !run.is_interactive() {
        return;
    }
    if let Some(entity) = targeting.current {
        commands.trigger(InteractEvent { entity });
    }
}

/// Routes an interact press by the kind of the targeted entity.
pub fn interact_observer(trigger: On<InteractEvent>, mut ctx: InteractionContext) {
    let entity = trigger.event().entity;
    if !ctx.run.is_interactive() {
        return;
    }
    let Ok((_, kind, owned)) = ctx.interactables.get(entity) else {
        debug!("interact on {:?} ignored: not interactable", entity);
        return;
    };
    let (kind, owned) = (*kind, owned.copied());
    debug!("interact on {:?} ({:?})", entity, kind);
    match kind {
        Interactable::Key { .. } => collect_key(&mut ctx, entity),
        Interactable::Door => use_door(&mut ctx),
        Interactable::Chest => {
            ctx.hud.write(HudCmd::message("Empty chest...", 2000));
        }
        _ => dispatch_puzzle_interaction(&mut ctx, entity, kind, owned),
    }
}

fn collect_key(ctx: &mut InteractionContext, entity: Entity) {
    ctx.despawn(entity);
    let collected = ctx.run.collect_key();
    let required = ctx.run.keys_required();
    ctx.audio.write(AudioCue::Pickup);
    let text = if collected >= required {
        format!("Collected enough keys! ({collected}/{required})")
    } else {
        format!("Picked up key! ({collected}/{required})")
    };
    ctx.hud.write(HudCmd::message(text, 2000));
    if ctx.run.door_unlockable() {
        ctx.door.mark_unlockable();
    }
    info!("key collected ({collected}/{required})");
}

fn use_door(ctx: &mut InteractionContext) {
    if ctx.run.transition_pending() {
        return;
    }
    if !ctx.run.door_unlockable() {
        let needed = ctx.run.keys_missing();
        let text = if needed > 0 {
            format!("Need {needed} more key{}!", if needed > 1 { "s" } else { "" })
        } else {
            "🔒 Door is locked - solve puzzle to open".to_string()
        };
        ctx.hud.write(HudCmd::message(text, 2000));
        return;
    }

    let room = ctx.run.current_room();
    if ctx.door.open() {
        ctx.audio.write(AudioCue::DoorOpen);
        let name = ctx
            .catalog
            .find(room)
            .map_or_else(|| format!("Room {room}"), |config| config.name.clone());
        ctx.hud.write(HudCmd::message(
            format!("✅ {name} completed!\n🚪 Press E again to enter next room"),
            4000,
        ));
        info!("door of room {room} opened");
    } else {
        ctx.hud.write(HudCmd::message("🎉 Moving to next room...", 1500));
        ctx.commands.trigger(DoorEnteredEvent { room });
    }
}
