//! Room-scoped entity markers.
//!
//! Entities with [`RoomScoped`] are despawned when the room is torn down
//! (transition or restart). The exit door is not room-scoped: it is spawned
//! once and repositioned for every room, and carries [`DoorPanel`] instead.

use bevy_ecs::prelude::Component;

/// Tag component for entities that live only as long as the current room.
#[derive(Component, Clone, Debug)]
pub struct RoomScoped;

/// Tag component for the exit door entity.
#[derive(Component, Clone, Debug)]
pub struct DoorPanel;
