//! Exit door controller.
//!
//! [`DoorState`] holds the lock/open/swing state of the current room's door.
//! It is reset by [`DoorState::setup`] every time a room is configured and
//! answers collision queries for candidate player positions.
//!
//! ```text
//! Locked -> Unlockable -> Opening -> Open
//! ```
use crate::components::emissive::Emissive;
use crate::components::worldposition::Extent;
use crate::resources::roomlayout::{EYE_HEIGHT, PlanePoint, RoomLayout};
use bevy_ecs::prelude::*;
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

/// Radians per second of swing.
pub const DOOR_OPEN_SPEED: f32 = 2.0;
/// Offset of the hinge from the door center.
pub const SWING_RADIUS: f32 = 0.5;
/// Passable window around the door center.
pub const DOOR_WIDTH: f32 = 1.2;
/// Door center height.
pub const DOOR_CENTER_Y: f32 = 1.0;
pub const PLAYER_RADIUS: f32 = 0.3;
/// Distance from a wall at which the player is stopped.
pub const WALL_MARGIN: f32 = PLAYER_RADIUS + 0.1;
/// Max distance of the door from a wall for that wall to claim it.
const DIRECTION_THRESHOLD: f32 = 0.5;

const LOCK_LOCKED: u32 = 0xff0000;
const LOCK_OPEN: u32 = 0x00ff00;

/// Wall the door is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorDirection {
    #[default]
    South,
    North,
    East,
    West,
}

impl DoorDirection {
    /// Derives the wall from a local door position. Defaults to south.
    pub fn from_local(door: PlanePoint, half: f32) -> Self {
        if (door.z + half).abs() < DIRECTION_THRESHOLD {
            DoorDirection::South
        } else if (door.z - half).abs() < DIRECTION_THRESHOLD {
            DoorDirection::North
        } else if (door.x - half).abs() < DIRECTION_THRESHOLD {
            DoorDirection::East
        } else if (door.x + half).abs() < DIRECTION_THRESHOLD {
            DoorDirection::West
        } else {
            DoorDirection::South
        }
    }

    /// Yaw of the closed door.
    pub fn base_yaw(self) -> f32 {
        match self {
            DoorDirection::South => 0.0,
            DoorDirection::North => PI,
            DoorDirection::East => -FRAC_PI_2,
            DoorDirection::West => FRAC_PI_2,
        }
    }

    /// Whether the door plane spans the z axis.
    fn turned(self) -> bool {
        matches!(self, DoorDirection::East | DoorDirection::West)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoorPhase {
    #[default]
    Locked,
    Unlockable,
    Opening,
    Open,
}

/// Position and yaw of the door panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorPose {
    pub position: Vec3,
    pub yaw: f32,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct DoorState {
    room: u32,
    is_open: bool,
    open_angle: f32,
    direction: DoorDirection,
    phase: DoorPhase,
    initial_yaw: f32,
    initial_position: PlanePoint,
}

impl DoorState {
    /// Places the closed door for `room` and resets its state.
    pub fn setup(&mut self, layout: &RoomLayout, room: u32) {
        let direction = DoorDirection::from_local(layout.local_door(room), layout.half_size());
        *self = Self {
            room,
            is_open: false,
            open_angle: 0.0,
            direction,
            phase: DoorPhase::Locked,
            initial_yaw: direction.base_yaw(),
            initial_position: layout.door_world_position(room),
        };
    }

    /// Lock condition met; the next interaction opens the door.
    pub fn mark_unlockable(&mut self) {
        if self.phase == DoorPhase::Locked {
            self.phase = DoorPhase::Unlockable;
        }
    }

    /// Unlocks the door and starts the swing. Returns false if already open.
    pub fn open(&mut self) -> bool {
        if self.is_open {
            return false;
        }
        self.is_open = true;
        self.phase = DoorPhase::Opening;
        true
    }

    /// Advances the swing. Returns the new pose while the door moves.
    pub fn animate(&mut self, delta: f32) -> Option<DoorPose> {
        if !self.is_open || self.open_angle >= FRAC_PI_2 {
            return None;
        }
        self.open_angle = (self.open_angle + delta * DOOR_OPEN_SPEED).min(FRAC_PI_2);
        if self.open_angle >= FRAC_PI_2 {
            self.phase = DoorPhase::Open;
        }
        Some(self.pose())
    }

    /// Current panel pose derived from the swing angle.
    pub fn pose(&self) -> DoorPose {
        let angle = self.open_angle;
        let base = self.initial_position;
        let swing = angle.sin() * SWING_RADIUS;
        let pull = (1.0 - angle.cos()) * SWING_RADIUS;
        let (yaw, x, z) = match self.direction {
            DoorDirection::South => (self.initial_yaw + angle, base.x + swing, base.z + pull),
            DoorDirection::North => (self.initial_yaw - angle, base.x - swing, base.z - pull),
            DoorDirection::East => (self.initial_yaw + angle, base.x - pull, base.z - swing),
            DoorDirection::West => (self.initial_yaw - angle, base.x + pull, base.z + swing),
        };
        DoorPose {
            position: Vec3::new(x, DOOR_CENTER_Y, z),
            yaw,
        }
    }

    /// Hit box of the closed panel.
    pub fn closed_extent(&self) -> Extent {
        let panel = Extent::new(DOOR_WIDTH / 2.0, DOOR_CENTER_Y, 0.05);
        if self.direction.turned() {
            panel.turned()
        } else {
            panel
        }
    }

    /// Panel glow: yellow once unlocked.
    pub fn panel_emissive(&self) -> Emissive {
        if self.is_open {
            Emissive::new(0xffff00, 0.3)
        } else {
            Emissive::OFF
        }
    }

    /// Lock indicator glow.
    pub fn lock_emissive(&self) -> Emissive {
        if self.is_open {
            Emissive::new(LOCK_OPEN, 1.0)
        } else {
            Emissive::new(LOCK_LOCKED, 0.5)
        }
    }

    /// Whether a player standing at `candidate` collides with the room walls
    /// or the closed door.
    pub fn blocks(&self, layout: &RoomLayout, candidate: Vec3) -> bool {
        let origin = layout.origin_of(self.room);
        let half = layout.half_size();
        let door = self.initial_position;
        let window = DOOR_WIDTH / 2.0;
        let through = |dir: DoorDirection, offset: f32| {
            self.is_open && self.direction == dir && offset <= window
        };

        let mut hit_wall = false;
        if candidate.x < origin.x - half + WALL_MARGIN {
            hit_wall = !through(DoorDirection::West, (candidate.z - door.z).abs());
        } else if candidate.x > origin.x + half - WALL_MARGIN {
            hit_wall = !through(DoorDirection::East, (candidate.z - door.z).abs());
        }
        if !hit_wall {
            if candidate.z < origin.z - half + WALL_MARGIN {
                hit_wall = !through(DoorDirection::South, (candidate.x - door.x).abs());
            } else if candidate.z > origin.z + half - WALL_MARGIN {
                hit_wall = !through(DoorDirection::North, (candidate.x - door.x).abs());
            }
        }
        if hit_wall {
            return true;
        }

        if (candidate.y - EYE_HEIGHT).abs() > 0.5 {
            return true;
        }

        if !self.is_open {
            let player = Extent::new(PLAYER_RADIUS, EYE_HEIGHT / 2.0, PLAYER_RADIUS);
            let pose = self.pose();
            if player.intersects(candidate, &self.closed_extent(), pose.position) {
                return true;
            }
        }
        false
    }

    pub fn room(&self) -> u32 {
        self.room
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open_angle(&self) -> f32 {
        self.open_angle
    }

    pub fn direction(&self) -> DoorDirection {
        self.direction
    }

    pub fn phase(&self) -> DoorPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::roomcatalog::{DoorPlacement, RoomCatalog};

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn make_layout(door: DoorPlacement) -> RoomLayout {
        let mut catalog = RoomCatalog::builtin();
        catalog.rooms.truncate(1);
        catalog.rooms[0].door_position = door;
        let mut layout = RoomLayout::new();
        layout.layout_grid(&catalog, 1, 1, 1.0);
        layout
    }

    fn make_door(door: DoorPlacement) -> (DoorState, RoomLayout) {
        let layout = make_layout(door);
        let mut state = DoorState::default();
        state.setup(&layout, 1);
        (state, layout)
    }

    #[test]
    fn direction_from_local_position() {
        let half = 8.0;
        let at = |x, z| DoorDirection::from_local(PlanePoint { x, z }, half);
        assert_eq!(at(0.0, -8.0), DoorDirection::South);
        assert_eq!(at(2.0, 8.0), DoorDirection::North);
        assert_eq!(at(8.0, -4.0), DoorDirection::East);
        assert_eq!(at(-7.8, 0.0), DoorDirection::West);
        assert_eq!(at(0.0, 0.0), DoorDirection::South);
    }

    #[test]
    fn swing_stops_at_quarter_turn() {
        let (mut door, _) = make_door(DoorPlacement { x: 0.0, z: -8.0 });
        assert!(door.animate(1.0).is_none());
        assert!(door.open());
        assert!(!door.open());
        let mut last = door.open_angle();
        for _ in 0..30 {
            door.animate(0.1);
            assert!(door.open_angle() >= last);
            last = door.open_angle();
        }
        assert!(approx_eq(door.open_angle(), FRAC_PI_2));
        assert_eq!(door.phase(), DoorPhase::Open);
        assert!(door.animate(0.1).is_none());
    }

    #[test]
    fn south_door_swings_along_formula() {
        let (mut door, _) = make_door(DoorPlacement { x: 0.0, z: -8.0 });
        door.open();
        let pose = door.animate(FRAC_PI_2 / DOOR_OPEN_SPEED).unwrap();
        assert!(approx_eq(pose.yaw, FRAC_PI_2));
        assert!(approx_eq(pose.position.x, 0.5));
        assert!(approx_eq(pose.position.z, -7.5));
    }

    #[test]
    fn east_door_swings_inward() {
        let (mut door, _) = make_door(DoorPlacement { x: 8.0, z: 0.0 });
        assert_eq!(door.direction(), DoorDirection::East);
        door.open();
        let pose = door.animate(10.0).unwrap();
        assert!(approx_eq(pose.yaw, 0.0));
        assert!(approx_eq(pose.position.x, 7.5));
        assert!(approx_eq(pose.position.z, -0.5));
    }

    #[test]
    fn setup_resets_state() {
        let (mut door, layout) = make_door(DoorPlacement { x: 0.0, z: 8.0 });
        door.mark_unlockable();
        door.open();
        door.animate(0.2);
        door.setup(&layout, 1);
        assert!(!door.is_open());
        assert_eq!(door.open_angle(), 0.0);
        assert_eq!(door.phase(), DoorPhase::Locked);
        assert_eq!(door.direction(), DoorDirection::North);
    }

    #[test]
    fn walls_block_near_edges() {
        let (door, layout) = make_door(DoorPlacement { x: 0.0, z: 8.0 });
        assert!(!door.blocks(&layout, Vec3::new(0.0, EYE_HEIGHT, 0.0)));
        assert!(door.blocks(&layout, Vec3::new(7.8, EYE_HEIGHT, 0.0)));
        assert!(door.blocks(&layout, Vec3::new(0.0, EYE_HEIGHT, -7.8)));
        assert!(door.blocks(&layout, Vec3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn open_door_lets_player_through_its_window() {
        let (mut door, layout) = make_door(DoorPlacement { x: 0.0, z: 8.0 });
        let in_doorway = Vec3::new(0.2, EYE_HEIGHT, 7.8);
        let beside_door = Vec3::new(2.0, EYE_HEIGHT, 7.8);
        assert!(door.blocks(&layout, in_doorway));
        door.open();
        assert!(!door.blocks(&layout, in_doorway));
        assert!(door.blocks(&layout, beside_door));
    }

    #[test]
    fn closed_door_panel_blocks_inside_margin() {
        let (door, layout) = make_door(DoorPlacement { x: 0.0, z: 0.0 });
        // Door placed mid-room (defaults to south facing); its panel still blocks.
        assert!(door.blocks(&layout, Vec3::new(0.0, EYE_HEIGHT, 0.2)));
        assert!(!door.blocks(&layout, Vec3::new(0.0, EYE_HEIGHT, 1.0)));
    }
}
