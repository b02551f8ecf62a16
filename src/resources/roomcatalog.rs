//! Static per-room configuration.
//!
//! The [`RoomCatalog`] resource holds one [`RoomConfig`] per room, in play
//! order. It is read-only at runtime. A built-in five-room catalog is used
//! unless a JSON catalog is loaded with [`RoomCatalog::load_from_file`].
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "rooms": [
//!     {
//!       "id": 1,
//!       "name": "Crimson Study",
//!       "wall_color": 9109504,
//!       "floor_color": 4864554,
//!       "door_position": { "x": 0.0, "z": 8.0 },
//!       "furniture": [
//!         { "type": "table", "position": { "x": -4.0, "y": 0.75, "z": 2.0 } },
//!         { "type": "painting", "position": { "x": 0.0, "y": 2.5, "z": -7.9 }, "rotation": 0.0 }
//!       ],
//!       "bonus_collectibles": 5
//!     }
//!   ]
//! }
//! ```

use crate::error::{CatalogError, SetupError};
use bevy_ecs::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Room-local coordinates. `y` defaults to the floor.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalPoint {
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub z: f32,
}

impl LocalPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Known furniture pieces.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FurnitureKind {
    Table,
    Chest,
    Pillar,
    Bookshelf,
    Chair,
    Vase,
    Painting,
    Statue,
    Lamp,
    Plant,
    Mirror,
    Rug,
    Clock,
}

impl FurnitureKind {
    /// Parses a catalog type string. Unknown strings yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "table" => FurnitureKind::Table,
            "chest" => FurnitureKind::Chest,
            "pillar" => FurnitureKind::Pillar,
            "bookshelf" => FurnitureKind::Bookshelf,
            "chair" => FurnitureKind::Chair,
            "vase" => FurnitureKind::Vase,
            "painting" => FurnitureKind::Painting,
            "statue" => FurnitureKind::Statue,
            "lamp" => FurnitureKind::Lamp,
            "plant" => FurnitureKind::Plant,
            "mirror" => FurnitureKind::Mirror,
            "rug" => FurnitureKind::Rug,
            "clock" => FurnitureKind::Clock,
            _ => return None,
        };
        Some(kind)
    }

    /// Approximate half sizes of the piece, for the renderer and hit tests.
    pub fn half_extents(self) -> (f32, f32, f32) {
        match self {
            FurnitureKind::Table => (0.75, 0.3, 0.5),
            FurnitureKind::Chest => (0.4, 0.3, 0.3),
            FurnitureKind::Pillar => (0.2, 0.75, 0.2),
            FurnitureKind::Bookshelf => (0.15, 0.9, 0.3),
            FurnitureKind::Chair => (0.25, 0.35, 0.25),
            FurnitureKind::Vase => (0.15, 0.175, 0.15),
            FurnitureKind::Painting => (0.6, 0.75, 0.075),
            FurnitureKind::Statue => (0.2, 0.35, 0.2),
            FurnitureKind::Lamp => (0.12, 0.5, 0.12),
            FurnitureKind::Plant => (0.15, 0.35, 0.15),
            FurnitureKind::Mirror => (0.5, 0.65, 0.075),
            FurnitureKind::Rug => (1.5, 0.01, 1.0),
            FurnitureKind::Clock => (0.3, 0.3, 0.075),
        }
    }
}

/// One furniture entry. `kind` stays a string so unknown types can be
/// skipped with a warning instead of failing the whole catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FurniturePlacement {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: LocalPoint,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub size: Option<f32>,
}

impl FurniturePlacement {
    fn new(kind: &str, x: f32, y: f32, z: f32) -> Self {
        Self {
            kind: kind.to_string(),
            position: LocalPoint::new(x, y, z),
            rotation: None,
            size: None,
        }
    }

    fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }

    fn sized(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }
}

/// Door position on the room floor plan.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct DoorPlacement {
    pub x: f32,
    pub z: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub id: u32,
    pub name: String,
    pub wall_color: u32,
    pub floor_color: u32,
    #[serde(default)]
    pub furniture: Vec<FurniturePlacement>,
    pub door_position: DoorPlacement,
    /// Bonus crystals to collect after the base color sequence is solved.
    #[serde(default)]
    pub bonus_collectibles: Option<u32>,
}

#[derive(Resource, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoomCatalog {
    pub rooms: Vec<RoomConfig>,
}

impl Default for RoomCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoomCatalog {
    pub fn new(rooms: Vec<RoomConfig>) -> Self {
        Self { rooms }
    }

    /// Number of rooms in the run.
    pub fn total(&self) -> u32 {
        self.rooms.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Strict lookup by id.
    pub fn find(&self, room: u32) -> Option<&RoomConfig> {
        self.rooms.iter().find(|cfg| cfg.id == room)
    }

    /// Lookup that falls back to the first room for unknown ids.
    pub fn get(&self, room: u32) -> Result<&RoomConfig, SetupError> {
        self.find(room)
            .or_else(|| self.rooms.first())
            .ok_or(SetupError::EmptyCatalog)
    }

    /// Loads a catalog from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: RoomCatalog = serde_json::from_str(&contents)?;
        if catalog.is_empty() {
            return Err(CatalogError::Empty);
        }
        info!("Loaded room catalog {:?} with {} rooms", path, catalog.total());
        Ok(catalog)
    }

    /// The five rooms shipped with the game.
    pub fn builtin() -> Self {
        use std::f32::consts::{FRAC_PI_2, PI};
        Self::new(vec![
            RoomConfig {
                id: 1,
                name: "Crimson Study".to_string(),
                wall_color: 0x8b0000,
                floor_color: 0x4a3a2a,
                door_position: DoorPlacement { x: 0.0, z: 8.0 },
                furniture: vec![
                    FurniturePlacement::new("table", -4.0, 0.75, 2.0),
                    FurniturePlacement::new("chair", -4.0, 0.45, 3.2),
                    FurniturePlacement::new("bookshelf", -7.5, 0.9, -2.0),
                    FurniturePlacement::new("chest", 6.5, 0.3, 2.5),
                    FurniturePlacement::new("painting", 0.0, 2.5, -7.9),
                    FurniturePlacement::new("lamp", 3.0, 0.5, -6.5),
                ],
                bonus_collectibles: None,
            },
            RoomConfig {
                id: 2,
                name: "Azure Archive".to_string(),
                wall_color: 0x1e3a5f,
                floor_color: 0x2f2f3f,
                door_position: DoorPlacement { x: 5.0, z: -8.0 },
                furniture: vec![
                    FurniturePlacement::new("bookshelf", -7.5, 0.9, 3.0),
                    FurniturePlacement::new("bookshelf", -7.5, 0.9, 5.0),
                    FurniturePlacement::new("pillar", -5.0, 0.75, 5.0),
                    FurniturePlacement::new("clock", 0.0, 2.8, 7.9).rotated(PI),
                    FurniturePlacement::new("rug", 0.0, 0.01, 2.0).sized(3.0),
                    FurniturePlacement::new("vase", 6.0, 0.2, 6.0),
                ],
                bonus_collectibles: None,
            },
            RoomConfig {
                id: 3,
                name: "Verdant Vault".to_string(),
                wall_color: 0x2e5e3e,
                floor_color: 0x3b3b2b,
                door_position: DoorPlacement { x: -8.0, z: 0.0 },
                furniture: vec![
                    FurniturePlacement::new("plant", -6.5, 0.2, 6.5),
                    FurniturePlacement::new("plant", 6.5, 0.2, -6.5),
                    FurniturePlacement::new("statue", 5.0, 0.2, 5.0),
                    FurniturePlacement::new("chest", -5.0, 0.3, -6.5),
                    FurniturePlacement::new("mirror", 7.9, 1.8, -3.0).rotated(-FRAC_PI_2),
                ],
                bonus_collectibles: None,
            },
            RoomConfig {
                id: 4,
                name: "Golden Gallery".to_string(),
                wall_color: 0x8b7500,
                floor_color: 0x4b3b1b,
                door_position: DoorPlacement { x: -4.0, z: 8.0 },
                furniture: vec![
                    FurniturePlacement::new("painting", 3.0, 2.5, -7.9),
                    FurniturePlacement::new("painting", -3.0, 2.5, -7.9),
                    FurniturePlacement::new("statue", -6.0, 0.2, -4.0),
                    FurniturePlacement::new("pillar", 6.0, 0.75, 6.0),
                    FurniturePlacement::new("lamp", 6.5, 0.5, -6.5),
                    // Not a known piece; skipped with a warning.
                    FurniturePlacement::new("harp", 3.0, 0.0, 6.0),
                ],
                bonus_collectibles: None,
            },
            RoomConfig {
                id: 5,
                name: "Obsidian Chamber".to_string(),
                wall_color: 0x1a1a2e,
                floor_color: 0x16213e,
                door_position: DoorPlacement { x: 8.0, z: -4.0 },
                furniture: vec![
                    FurniturePlacement::new("pillar", -3.0, 0.75, -3.0),
                    FurniturePlacement::new("pillar", 3.0, 0.75, 3.0),
                    FurniturePlacement::new("chest", 0.0, 0.3, 7.0),
                    FurniturePlacement::new("clock", -7.9, 2.8, 0.0).rotated(FRAC_PI_2),
                    FurniturePlacement::new("table", 4.0, 0.75, -2.0),
                ],
                bonus_collectibles: Some(5),
            },
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_catalog_has_five_rooms_and_one_bonus_room() {
        let catalog = RoomCatalog::builtin();
        assert_eq!(catalog.total(), 5);
        let bonus: Vec<u32> = catalog
            .rooms
            .iter()
            .filter(|r| r.bonus_collectibles.is_some())
            .map(|r| r.id)
            .collect();
        assert_eq!(bonus, vec![5]);
    }

    #[test]
    fn unknown_room_falls_back_to_first() {
        let catalog = RoomCatalog::builtin();
        assert_eq!(catalog.get(42).unwrap().id, 1);
        assert!(catalog.find(42).is_none());
    }

    #[test]
    fn empty_catalog_lookup_is_an_error() {
        let catalog = RoomCatalog::new(Vec::new());
        assert!(matches!(catalog.get(1), Err(SetupError::EmptyCatalog)));
    }

    #[test]
    fn furniture_kind_parsing() {
        assert_eq!(FurnitureKind::parse("Chest"), Some(FurnitureKind::Chest));
        assert_eq!(FurnitureKind::parse("harp"), None);
    }

    #[test]
    fn loads_catalog_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"rooms":[{{"id":7,"name":"Test","wall_color":1,"floor_color":2,
                "door_position":{{"x":0.0,"z":-8.0}},
                "furniture":[{{"type":"chest","position":{{"x":1.0,"z":2.0}}}}]}}]}}"#
        )
        .unwrap();
        let catalog = RoomCatalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.total(), 1);
        let room = catalog.get(7).unwrap();
        assert_eq!(room.furniture[0].position.y, 0.0);
        assert_eq!(room.bonus_collectibles, None);
    }

    #[test]
    fn empty_json_catalog_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rooms":[]}}"#).unwrap();
        assert!(matches!(
            RoomCatalog::load_from_file(file.path()),
            Err(CatalogError::Empty)
        ));
    }
}
