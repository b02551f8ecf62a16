//! Host-facing facade over the ECS world.
//!
//! [`Game`] owns the [`World`], the per-frame update schedule and the
//! receiving ends of the host channels. A host drives it with
//! [`Game::tick`], feeds it the camera through [`Game::set_player_view`] and
//! the interact key through [`Game::press_interact`], and drains HUD intents,
//! audio cues and game signals after each frame.
//!
//! Frame order:
//! 1. scheduled tasks (flash reverts, pattern replay, room transition)
//! 2. countdown
//! 3. targeting
//! 4. interact dispatch
//! 5. door, key and crystal animation
//! 6. antagonist pursuit
//! 7. forwarding of queued intents to the host channels
use bevy_ecs::observer::Observer;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{error, info, warn};

use crate::components::emissive::Emissive;
use crate::components::interactable::Interactable;
use crate::components::roomscoped::DoorPanel;
use crate::components::rotation::Rotation;
use crate::components::worldposition::{Extent, WorldPosition};
use crate::error::SetupError;
use crate::events::audio::AudioCue;
use crate::events::flow::GameSignal;
use crate::events::hud::HudCmd;
use crate::resources::bridge::{HostReceivers, setup_host_bridge};
use crate::resources::door::DoorState;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::playerview::PlayerView;
use crate::resources::puzzle::PuzzleSession;
use crate::resources::rng::GameRng;
use crate::resources::roomcatalog::RoomCatalog;
use crate::resources::roomlayout::RoomLayout;
use crate::resources::runstate::{RunSnapshot, RunState};
use crate::resources::savestore::SaveStore;
use crate::resources::scheduler::Scheduler;
use crate::resources::targeting::Targeting;
use crate::resources::worldtime::WorldTime;
use crate::systems::animation::{bob_system, spin_system};
use crate::systems::antagonist::{antagonist_pursuit_system, spawn_antagonist_on_room_entered};
use crate::systems::bridge::{
    forward_audio_cues, forward_game_signals, forward_hud_cmds, update_host_messages,
};
use crate::systems::countdown::{countdown_system, game_over_observer};
use crate::systems::door::door_animation_system;
use crate::systems::gameflow::{door_entered_observer, restart_run, start_run};
use crate::systems::interaction::{interact_input_system, interact_observer};
use crate::systems::keys::spawn_keys_on_puzzle_solved;
use crate::systems::scheduler::run_scheduled_tasks;
use crate::systems::targeting::interaction_targeting_system;
use crate::systems::time::update_world_time;

pub struct Game {
    world: World,
    update: Schedule,
    forward: Schedule,
    receivers: HostReceivers,
}

impl Game {
    /// Builds a game from `config`, loading its room catalog if it names one.
    ///
    /// A catalog that cannot be loaded is replaced by the built-in one.
    pub fn new(config: GameConfig) -> Self {
        let catalog = match &config.catalog_path {
            Some(path) => match RoomCatalog::load_from_file(path) {
                Ok(catalog) => catalog,
                Err(err) => {
                    warn!("Using built-in room catalog: {err}");
                    RoomCatalog::builtin()
                }
            },
            None => RoomCatalog::builtin(),
        };
        Self::with_catalog(config, catalog)
    }

    /// Builds a game over an explicit catalog. The run is not started yet.
    pub fn with_catalog(config: GameConfig, catalog: RoomCatalog) -> Self {
        let mut world = World::new();

        let mut layout = RoomLayout::new();
        layout.layout_grid(&catalog, config.columns, config.rows, config.spacing);

        world.insert_resource(WorldTime::default());
        world.insert_resource(InputState::default());
        world.insert_resource(PlayerView::default());
        world.insert_resource(Targeting::default());
        world.insert_resource(Scheduler::default());
        world.insert_resource(DoorState::default());
        world.insert_resource(PuzzleSession::new(config.max_attempts));
        world.insert_resource(RunState::new(config.timer_rules()));
        world.insert_resource(SaveStore::new(config.save_path.clone()));
        world.insert_resource(GameRng::new(config.seed));
        world.insert_resource(layout);
        world.insert_resource(catalog);
        world.insert_resource(config);

        let receivers = setup_host_bridge(&mut world);

        // The door panel outlives rooms; setup only moves it.
        world.spawn((
            Interactable::Door,
            DoorPanel,
            WorldPosition::default(),
            Rotation::default(),
            Extent::new(0.6, 1.0, 0.05),
            Emissive::OFF,
        ));

        world.spawn(Observer::new(interact_observer));
        world.spawn(Observer::new(spawn_keys_on_puzzle_solved));
        world.spawn(Observer::new(door_entered_observer));
        world.spawn(Observer::new(game_over_observer));
        world.spawn(Observer::new(spawn_antagonist_on_room_entered));
        // Ensure the observers are registered before anything triggers.
        world.flush();

        let mut update = Schedule::default();
        update.add_systems(
            (
                run_scheduled_tasks,
                countdown_system,
                interaction_targeting_system,
                interact_input_system,
                door_animation_system,
                spin_system,
                bob_system,
                antagonist_pursuit_system,
            )
                .chain(),
        );
        if let Err(err) = update.initialize(&mut world) {
            error!("Failed to initialize update schedule: {err}");
        }

        let mut forward = Schedule::default();
        forward.add_systems(
            (
                update_host_messages,
                (forward_audio_cues, forward_hud_cmds, forward_game_signals),
            )
                .chain(),
        );
        if let Err(err) = forward.initialize(&mut world) {
            error!("Failed to initialize forward schedule: {err}");
        }

        Self {
            world,
            update,
            forward,
            receivers,
        }
    }

    /// Starts a run in room 1.
    pub fn start(&mut self) {
        start_run(&mut self.world, 1);
    }

    /// Starts a run in `room`. Fails for ids outside the catalog.
    pub fn start_at(&mut self, room: u32) -> Result<(), SetupError> {
        let total = self.total_rooms();
        if total == 0 {
            return Err(SetupError::EmptyCatalog);
        }
        if room == 0 || room > total {
            return Err(SetupError::UnknownRoom(room));
        }
        start_run(&mut self.world, room);
        Ok(())
    }

    /// Back to room 1 with everything reset and a freshly generated puzzle.
    pub fn restart(&mut self) {
        restart_run(&mut self.world);
    }

    /// Advances the game by `delta` seconds.
    pub fn tick(&mut self, delta: f32) {
        update_world_time(&mut self.world, delta);
        self.update.run(&mut self.world);
        self.forward.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Queues an interact press for the next tick.
    pub fn press_interact(&mut self) {
        self.world.resource_mut::<InputState>().press_interact();
    }

    /// Updates the camera. A zero `forward` keeps the previous direction.
    pub fn set_player_view(&mut self, position: Vec3, forward: Vec3) {
        let mut view = self.world.resource_mut::<PlayerView>();
        view.position = position;
        let forward = forward.normalize_or_zero();
        if forward != Vec3::ZERO {
            view.forward = forward;
        }
    }

    pub fn player_view(&self) -> PlayerView {
        *self.world.resource::<PlayerView>()
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.world.resource_mut::<RunState>().set_paused(paused);
        info!("game {}", if paused { "paused" } else { "resumed" });
    }

    /// Whether the player may not stand at `position` (walls or closed door).
    pub fn is_blocked(&self, position: Vec3) -> bool {
        let layout = self.world.resource::<RoomLayout>();
        self.world.resource::<DoorState>().blocks(layout, position)
    }

    pub fn snapshot(&self) -> RunSnapshot {
        self.world.resource::<RunState>().snapshot(self.total_rooms())
    }

    /// Room a resumed run should start in, from the save point.
    pub fn resume_room(&self) -> u32 {
        self.world
            .resource::<SaveStore>()
            .resume_room(self.total_rooms())
    }

    pub fn total_rooms(&self) -> u32 {
        self.world.resource::<RoomCatalog>().total()
    }

    pub fn config(&self) -> &GameConfig {
        self.world.resource::<GameConfig>()
    }

    pub fn run_state(&self) -> &RunState {
        self.world.resource::<RunState>()
    }

    pub fn puzzle(&self) -> &PuzzleSession {
        self.world.resource::<PuzzleSession>()
    }

    pub fn door(&self) -> &DoorState {
        self.world.resource::<DoorState>()
    }

    pub fn layout(&self) -> &RoomLayout {
        self.world.resource::<RoomLayout>()
    }

    pub fn targeted(&self) -> Option<Entity> {
        self.world.resource::<Targeting>().current
    }

    /// HUD intents produced since the last drain.
    pub fn drain_hud(&mut self) -> Vec<HudCmd> {
        self.forward.run(&mut self.world);
        self.receivers.hud.try_iter().collect()
    }

    pub fn drain_audio(&mut self) -> Vec<AudioCue> {
        self.forward.run(&mut self.world);
        self.receivers.audio.try_iter().collect()
    }

    pub fn drain_signals(&mut self) -> Vec<GameSignal> {
        self.forward.run(&mut self.world);
        self.receivers.signals.try_iter().collect()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
