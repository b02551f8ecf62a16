//! Multi-room world grid.
//!
//! [`RoomLayout`] assigns every catalog room an origin on a centered grid and
//! resolves room-local coordinates to world space. The grid is assigned once
//! with [`RoomLayout::layout_grid`]; every other method is a pure lookup.
use crate::resources::roomcatalog::RoomCatalog;
use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Edge length of a room.
pub const ROOM_SIZE: f32 = 16.0;
pub const ROOM_HEIGHT: f32 = 5.0;
/// Camera height of a standing player.
pub const EYE_HEIGHT: f32 = 1.6;

/// A point on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PlanePoint {
    pub x: f32,
    pub z: f32,
}

/// World-space translation of a room's local frame.
pub type RoomOrigin = PlanePoint;

#[derive(Resource, Debug, Clone, Default)]
pub struct RoomLayout {
    origins: FxHashMap<u32, RoomOrigin>,
    local_doors: FxHashMap<u32, PlanePoint>,
    /// Door used for ids missing from the catalog.
    fallback_door: PlanePoint,
}

impl RoomLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns each catalog room an origin, row-major in catalog order.
    ///
    /// Extra cells stay empty; rooms beyond the grid capacity get no origin
    /// and resolve to `{0, 0}`.
    pub fn layout_grid(&mut self, catalog: &RoomCatalog, columns: u32, rows: u32, spacing: f32) {
        self.origins.clear();
        self.local_doors.clear();

        let total_width = columns as f32 * ROOM_SIZE + columns.saturating_sub(1) as f32 * spacing;
        let total_depth = rows as f32 * ROOM_SIZE + rows.saturating_sub(1) as f32 * spacing;
        let start_x = -total_width / 2.0 + ROOM_SIZE / 2.0;
        let start_z = -total_depth / 2.0 + ROOM_SIZE / 2.0;

        let mut rooms = catalog.rooms.iter();
        'grid: for r in 0..rows {
            for c in 0..columns {
                let Some(cfg) = rooms.next() else {
                    break 'grid;
                };
                let origin = RoomOrigin {
                    x: start_x + c as f32 * (ROOM_SIZE + spacing),
                    z: start_z + r as f32 * (ROOM_SIZE + spacing),
                };
                debug!("room {} origin ({}, {})", cfg.id, origin.x, origin.z);
                self.origins.insert(cfg.id, origin);
            }
        }
        let unplaced = rooms.count();
        if unplaced > 0 {
            warn!("{unplaced} rooms did not fit the {columns}x{rows} grid");
        }

        for cfg in &catalog.rooms {
            self.local_doors.insert(
                cfg.id,
                PlanePoint {
                    x: cfg.door_position.x,
                    z: cfg.door_position.z,
                },
            );
        }
        if let Some(first) = catalog.rooms.first() {
            self.fallback_door = PlanePoint {
                x: first.door_position.x,
                z: first.door_position.z,
            };
        }
    }

    /// Origin of a room, `{0, 0}` when the room has none.
    pub fn origin_of(&self, room: u32) -> RoomOrigin {
        self.origins.get(&room).copied().unwrap_or_default()
    }

    pub fn has_origin(&self, room: u32) -> bool {
        self.origins.contains_key(&room)
    }

    /// Door position in the room's local frame.
    pub fn local_door(&self, room: u32) -> PlanePoint {
        self.local_doors
            .get(&room)
            .copied()
            .unwrap_or(self.fallback_door)
    }

    pub fn door_world_position(&self, room: u32) -> PlanePoint {
        let origin = self.origin_of(room);
        let door = self.local_door(room);
        PlanePoint {
            x: origin.x + door.x,
            z: origin.z + door.z,
        }
    }

    /// Spawn point: 40% of the door offset, mirrored toward the interior.
    pub fn start_position(&self, room: u32) -> Vec3 {
        let origin = self.origin_of(room);
        let door = self.local_door(room);
        Vec3::new(origin.x - door.x * 0.4, EYE_HEIGHT, origin.z - door.z * 0.4)
    }

    /// Converts a room-local point to world space.
    pub fn to_world(&self, room: u32, local: Vec3) -> Vec3 {
        let origin = self.origin_of(room);
        Vec3::new(origin.x + local.x, local.y, origin.z + local.z)
    }

    pub fn half_size(&self) -> f32 {
        ROOM_SIZE / 2.0
    }
}
