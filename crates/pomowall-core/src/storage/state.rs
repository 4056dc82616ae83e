//! Persisted preferences and lifetime statistics.
//!
//! The record is small and rewritten on every transition, so it is stored as
//! a single JSON document and replaced atomically (write temp, fsync, rename).
//! Loading never fails: a missing or unreadable file yields defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use super::data_dir;
use crate::error::ConfigError;

pub const STATE_FILE_NAME: &str = "state.json";

/// User choices that survive restarts. `None` means system behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub wallpaper_path: Option<PathBuf>,
    #[serde(default)]
    pub ringtone_path: Option<PathBuf>,
}

/// Everything written to `state.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(flatten)]
    pub preferences: Preferences,
    #[serde(default)]
    pub pomodoro_count: u64,
    /// Desktop background in place before pomowall swapped it. Set while a
    /// swap is active so a later process can still put it back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_wallpaper: Option<PathBuf>,
}

/// Owner of the on-disk state file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at `<data_dir>/state.json`.
    pub fn open() -> Result<Self, ConfigError> {
        Ok(Self::at(data_dir()?.join(STATE_FILE_NAME)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state file, falling back to defaults when it is missing or
    /// malformed.
    pub fn load(&self) -> PersistedState {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, using defaults");
                return PersistedState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "cannot read state file, using defaults");
                return PersistedState::default();
            }
        };

        match serde_json::from_str(&content) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "malformed state file, using defaults");
                PersistedState::default()
            }
        }
    }

    /// Replace the state file.
    ///
    /// A crash mid-write leaves either the previous file or the new one,
    /// never a truncated mix.
    pub fn save(&self, state: &PersistedState) -> Result<(), ConfigError> {
        let fail = |message: String| ConfigError::SaveFailed {
            path: self.path.clone(),
            message,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| fail(format!("failed to create directory: {e}")))?;

        let serialized = serde_json::to_string_pretty(state)
            .map_err(|e| fail(format!("failed to serialize state: {e}")))?;

        // Unique per save, so concurrent writers never share a temp file.
        let mut temp = NamedTempFile::new_in(dir)
            .map_err(|e| fail(format!("failed to create temp file: {e}")))?;
        temp.write_all(serialized.as_bytes())
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| fail(format!("failed to write temp file: {e}")))?;
        temp.persist(&self.path)
            .map_err(|e| fail(format!("failed to replace state file: {}", e.error)))?;

        info!(path = %self.path.display(), pomodoro_count = state.pomodoro_count, "state saved");
        Ok(())
    }
}
