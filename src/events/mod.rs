//! Event types exchanged across systems.
//!
//! Observer events ([`Event`](bevy_ecs::prelude::Event)) trigger immediate
//! reactions inside the world; messages ([`Message`](bevy_ecs::message::Message))
//! are queued and forwarded to the host once per frame.
//!
//! Submodules:
//! - [`audio`] – sound cues requested by the core
//! - [`flow`] – puzzle-solved and door-entered triggers, host-facing game signals
//! - [`hud`] – display intents (messages, prompts, interaction log, end screens)
//! - [`interaction`] – the interact trigger aimed at the targeted entity
pub mod audio;
pub mod flow;
pub mod hud;
pub mod interaction;
