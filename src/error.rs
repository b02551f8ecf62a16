//! Error types surfaced by the core.
//!
//! None of these end a run on their own. Setup errors are caught by the flow
//! controller and shown on the HUD; config, catalog and save errors make the
//! caller fall back to defaults.
use std::path::PathBuf;
use thiserror::Error;

/// Room construction failures.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("room catalog is empty")]
    EmptyCatalog,
    #[error("room {0} is not in the catalog")]
    UnknownRoom(u32),
}

/// INI configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("failed to save config file {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Room catalog loading failures.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains no rooms")]
    Empty,
}

/// Save-point persistence failures.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save point i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("save point json error: {0}")]
    Json(#[from] serde_json::Error),
}
