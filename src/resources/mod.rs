//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: run state, the active puzzle, room
//! layout and catalog, door, scheduler, targeting and host plumbing. Each
//! submodule documents the semantics and intended usage of its resource(s).
//!
//! Overview
//! - `bridge` – channels carrying audio cues, HUD intents and signals to the host
//! - `door` – lock/open/swing state of the exit door and its collision test
//! - `gameconfig` – tunables loaded from an INI file
//! - `input` – pending interact press
//! - `playerview` – camera position and forward vector supplied by the host
//! - `puzzle` – state machine of the single active puzzle session
//! - `rng` – seeded random source
//! - `roomcatalog` – static per-room configuration
//! - `roomlayout` – room origins on the world grid and local/world transforms
//! - `runstate` – run-wide counters, flags and countdown
//! - `savestore` – last-completed-room save point
//! - `scheduler` – timed tasks advanced once per frame
//! - `targeting` – the highlighted entity and its saved appearance
//! - `worldtime` – simulation time and delta
pub mod bridge;
pub mod door;
pub mod gameconfig;
pub mod input;
pub mod playerview;
pub mod puzzle;
pub mod rng;
pub mod roomcatalog;
pub mod roomlayout;
pub mod runstate;
pub mod savestore;
pub mod scheduler;
pub mod targeting;
pub mod worldtime;
