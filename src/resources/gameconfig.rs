//! Game configuration resource.
//!
//! Manages tunables loaded from an INI configuration file. Provides defaults
//! for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [world]
//! columns = 5
//! rows = 1
//! spacing = 1.0
//! catalog = ./rooms.json
//!
//! [timer]
//! base_seconds = 90
//! per_round_penalty = 5
//! minimum_seconds = 60
//!
//! [puzzle]
//! max_attempts = 3
//! transition_delay = 1.5
//!
//! [interaction]
//! max_raycast_distance = 8.0
//! max_interaction_distance = 6.0
//!
//! [antagonist]
//! start_room = 3
//! speed = 1.8
//! capture_distance = 0.8
//! capture_ends_run = true
//!
//! [save]
//! path = ./savepoint.json
//!
//! [rng]
//! seed = 42
//! ```

use crate::error::ConfigError;
use crate::resources::runstate::TimerRules;
use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_COLUMNS: u32 = 5;
const DEFAULT_ROWS: u32 = 1;
const DEFAULT_SPACING: f32 = 1.0;
const DEFAULT_BASE_SECONDS: u32 = 90;
const DEFAULT_PER_ROUND_PENALTY: u32 = 5;
const DEFAULT_MINIMUM_SECONDS: u32 = 60;
const DEFAULT_MAX_ATTEMPTS: u8 = 3;
const DEFAULT_TRANSITION_DELAY: f32 = 1.5;
const DEFAULT_MAX_RAYCAST_DISTANCE: f32 = 8.0;
const DEFAULT_MAX_INTERACTION_DISTANCE: f32 = 6.0;
const DEFAULT_ANTAGONIST_START_ROOM: u32 = 3;
const DEFAULT_ANTAGONIST_SPEED: f32 = 1.8;
const DEFAULT_CAPTURE_DISTANCE: f32 = 0.8;
const DEFAULT_CAPTURE_ENDS_RUN: bool = true;
const DEFAULT_SAVE_PATH: &str = "./savepoint.json";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Grid columns used to lay out room origins.
    pub columns: u32,
    /// Grid rows used to lay out room origins.
    pub rows: u32,
    /// Gap between neighbouring rooms.
    pub spacing: f32,
    /// Optional JSON room catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,
    pub base_seconds: u32,
    pub per_round_penalty: u32,
    pub minimum_seconds: u32,
    /// Attempts granted before the soft reset.
    pub max_attempts: u8,
    /// Seconds between entering the open door and the next room.
    pub transition_delay: f32,
    pub max_raycast_distance: f32,
    pub max_interaction_distance: f32,
    /// First room in which the antagonist appears.
    pub antagonist_start_room: u32,
    pub antagonist_speed: f32,
    pub capture_distance: f32,
    /// Whether being caught ends the run.
    pub capture_ends_run: bool,
    /// Where the save point is stored.
    pub save_path: PathBuf,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            spacing: DEFAULT_SPACING,
            catalog_path: None,
            base_seconds: DEFAULT_BASE_SECONDS,
            per_round_penalty: DEFAULT_PER_ROUND_PENALTY,
            minimum_seconds: DEFAULT_MINIMUM_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            transition_delay: DEFAULT_TRANSITION_DELAY,
            max_raycast_distance: DEFAULT_MAX_RAYCAST_DISTANCE,
            max_interaction_distance: DEFAULT_MAX_INTERACTION_DISTANCE,
            antagonist_start_room: DEFAULT_ANTAGONIST_START_ROOM,
            antagonist_speed: DEFAULT_ANTAGONIST_SPEED,
            capture_distance: DEFAULT_CAPTURE_DISTANCE,
            capture_ends_run: DEFAULT_CAPTURE_ENDS_RUN,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Countdown parameters for [`RunState`](crate::resources::runstate::RunState).
    pub fn timer_rules(&self) -> TimerRules {
        TimerRules {
            base_seconds: self.base_seconds,
            per_round_penalty: self.per_round_penalty,
            minimum_seconds: self.minimum_seconds,
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut config = Ini::new();
        config.load(&self.config_path).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;

        // [world] section
        if let Some(columns) = config.getuint("world", "columns").ok().flatten() {
            self.columns = columns as u32;
        }
        if let Some(rows) = config.getuint("world", "rows").ok().flatten() {
            self.rows = rows as u32;
        }
        if let Some(spacing) = config.getfloat("world", "spacing").ok().flatten() {
            self.spacing = spacing as f32;
        }
        if let Some(catalog) = config.get("world", "catalog") {
            self.catalog_path = Some(PathBuf::from(catalog));
        }

        // [timer] section
        if let Some(base) = config.getuint("timer", "base_seconds").ok().flatten() {
            self.base_seconds = base as u32;
        }
        if let Some(penalty) = config.getuint("timer", "per_round_penalty").ok().flatten() {
            self.per_round_penalty = penalty as u32;
        }
        if let Some(minimum) = config.getuint("timer", "minimum_seconds").ok().flatten() {
            self.minimum_seconds = minimum as u32;
        }

        // [puzzle] section
        if let Some(attempts) = config.getuint("puzzle", "max_attempts").ok().flatten() {
            self.max_attempts = attempts.clamp(1, u8::MAX as u64) as u8;
        }
        if let Some(delay) = config.getfloat("puzzle", "transition_delay").ok().flatten() {
            self.transition_delay = delay as f32;
        }

        // [interaction] section
        if let Some(dist) = config
            .getfloat("interaction", "max_raycast_distance")
            .ok()
            .flatten()
        {
            self.max_raycast_distance = dist as f32;
        }
        if let Some(dist) = config
            .getfloat("interaction", "max_interaction_distance")
            .ok()
            .flatten()
        {
            self.max_interaction_distance = dist as f32;
        }

        // [antagonist] section
        if let Some(room) = config.getuint("antagonist", "start_room").ok().flatten() {
            self.antagonist_start_room = room as u32;
        }
        if let Some(speed) = config.getfloat("antagonist", "speed").ok().flatten() {
            self.antagonist_speed = speed as f32;
        }
        if let Some(dist) = config
            .getfloat("antagonist", "capture_distance")
            .ok()
            .flatten()
        {
            self.capture_distance = dist as f32;
        }
        if let Some(ends) = config
            .getbool("antagonist", "capture_ends_run")
            .ok()
            .flatten()
        {
            self.capture_ends_run = ends;
        }

        // [save] section
        if let Some(path) = config.get("save", "path") {
            self.save_path = PathBuf::from(path);
        }

        // [rng] section
        if let Some(seed) = config.getuint("rng", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        info!(
            "Loaded config: grid {}x{} spacing={}, timer {}s -{}s/round min {}s, attempts={}, seed={:?}",
            self.columns,
            self.rows,
            self.spacing,
            self.base_seconds,
            self.per_round_penalty,
            self.minimum_seconds,
            self.max_attempts,
            self.seed
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        let mut config = Ini::new();

        // [world] section
        config.set("world", "columns", Some(self.columns.to_string()));
        config.set("world", "rows", Some(self.rows.to_string()));
        config.set("world", "spacing", Some(self.spacing.to_string()));
        if let Some(catalog) = &self.catalog_path {
            config.set("world", "catalog", Some(catalog.display().to_string()));
        }

        // [timer] section
        config.set("timer", "base_seconds", Some(self.base_seconds.to_string()));
        config.set(
            "timer",
            "per_round_penalty",
            Some(self.per_round_penalty.to_string()),
        );
        config.set(
            "timer",
            "minimum_seconds",
            Some(self.minimum_seconds.to_string()),
        );

        // [puzzle] section
        config.set("puzzle", "max_attempts", Some(self.max_attempts.to_string()));
        config.set(
            "puzzle",
            "transition_delay",
            Some(self.transition_delay.to_string()),
        );

        // [interaction] section
        config.set(
            "interaction",
            "max_raycast_distance",
            Some(self.max_raycast_distance.to_string()),
        );
        config.set(
            "interaction",
            "max_interaction_distance",
            Some(self.max_interaction_distance.to_string()),
        );

        // [antagonist] section
        config.set(
            "antagonist",
            "start_room",
            Some(self.antagonist_start_room.to_string()),
        );
        config.set("antagonist", "speed", Some(self.antagonist_speed.to_string()));
        config.set(
            "antagonist",
            "capture_distance",
            Some(self.capture_distance.to_string()),
        );
        config.set(
            "antagonist",
            "capture_ends_run",
            Some(self.capture_ends_run.to_string()),
        );

        // [save] section
        config.set("save", "path", Some(self.save_path.display().to_string()));

        // [rng] section
        if let Some(seed) = self.seed {
            config.set("rng", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|source| ConfigError::Save {
                path: self.config_path.clone(),
                source,
            })?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = GameConfig::new();
        assert_eq!(config.columns, 5);
        assert_eq!(config.base_seconds, 90);
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.antagonist_start_room, 3);
        assert!(config.capture_ends_run);
        assert!(config.seed.is_none());
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = GameConfig::with_path(dir.path().join("absent.ini"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.rows, 1);
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[timer]\nbase_seconds = 120\n[rng]\nseed = 7").unwrap();
        let mut config = GameConfig::with_path(file.path());
        config.load_from_file().unwrap();
        assert_eq!(config.base_seconds, 120);
        assert_eq!(config.per_round_penalty, 5);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        let mut original = GameConfig::with_path(&path);
        original.columns = 3;
        original.capture_ends_run = false;
        original.seed = Some(99);
        original.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert_eq!(loaded.columns, 3);
        assert!(!loaded.capture_ends_run);
        assert_eq!(loaded.seed, Some(99));
    }
}
