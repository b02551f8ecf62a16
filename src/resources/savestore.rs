//! Save point persistence.
//!
//! A single integer, the last completed room, stored as JSON at a
//! configurable path. It backs the resume affordance only; the room and
//! puzzle logic never read it.
use crate::error::SaveError;
use bevy_ecs::prelude::*;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub last_completed_room: u32,
}

#[derive(Resource, Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records `room` as the last completed room.
    pub fn save_progress(&self, room: u32) -> Result<(), SaveError> {
        let data = SaveData {
            last_completed_room: room,
        };
        std::fs::write(&self.path, serde_json::to_string(&data)?)?;
        info!("Save point updated: room {room}");
        Ok(())
    }

    /// Reads the save point, `None` when there is none.
    pub fn load(&self) -> Result<Option<SaveData>, SaveError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    /// Room to resume from: the one after the last completed, capped at
    /// `total`. Room 1 when nothing is saved.
    pub fn resume_room(&self, total: u32) -> u32 {
        match self.load() {
            Ok(Some(data)) => data
                .last_completed_room
                .saturating_add(1)
                .min(total.max(1)),
            Ok(None) => 1,
            Err(err) => {
                warn!("Could not read save point {:?}: {}", self.path, err);
                1
            }
        }
    }

    pub fn clear(&self) -> Result<(), SaveError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Save point cleared");
        }
        Ok(())
    }
}
