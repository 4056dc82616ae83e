use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::state::{ConfigStore, PersistedState, Preferences};
use crate::error::ConfigError;

/// In-memory copy of the persisted state, shared between the front end and
/// the dispatcher. Setters write through to the [`ConfigStore`].
///
/// Other processes may write the same file, so every save re-reads it and
/// merges: fields changed through this handle win, everything else comes
/// from disk, and the pomodoro count takes the larger value.
#[derive(Debug, Clone)]
pub struct SharedPreferences {
    store: ConfigStore,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    state: PersistedState,
    changed: Changed,
}

/// Fields set through this handle and not yet written.
#[derive(Debug, Default, Clone, Copy)]
struct Changed {
    wallpaper_path: bool,
    ringtone_path: bool,
    original_wallpaper: bool,
}

impl SharedPreferences {
    /// Load the current file contents (or defaults).
    pub fn load(store: ConfigStore) -> Self {
        let state = store.load();
        Self {
            store,
            inner: Arc::new(Mutex::new(Inner {
                state,
                changed: Changed::default(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn snapshot(&self) -> PersistedState {
        self.lock().state.clone()
    }

    pub fn preferences(&self) -> Preferences {
        self.lock().state.preferences.clone()
    }

    pub fn wallpaper_path(&self) -> Option<PathBuf> {
        self.lock().state.preferences.wallpaper_path.clone()
    }

    pub fn ringtone_path(&self) -> Option<PathBuf> {
        self.lock().state.preferences.ringtone_path.clone()
    }

    pub fn pomodoro_count(&self) -> u64 {
        self.lock().state.pomodoro_count
    }

    pub fn original_wallpaper(&self) -> Option<PathBuf> {
        self.lock().state.original_wallpaper.clone()
    }

    pub fn set_wallpaper_path(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.state.preferences.wallpaper_path = path;
        inner.changed.wallpaper_path = true;
        self.write(&mut inner)
    }

    pub fn set_ringtone_path(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        inner.state.preferences.ringtone_path = path;
        inner.changed.ringtone_path = true;
        self.write(&mut inner)
    }

    pub fn set_original_wallpaper(&self, path: Option<PathBuf>) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        if inner.state.original_wallpaper == path {
            return Ok(());
        }
        inner.state.original_wallpaper = path;
        inner.changed.original_wallpaper = true;
        self.write(&mut inner)
    }

    /// Record the engine's lifetime count. The stored value never goes down.
    pub fn record_pomodoros(&self, completed: u64) {
        let mut inner = self.lock();
        inner.state.pomodoro_count = inner.state.pomodoro_count.max(completed);
    }

    /// Merge the in-memory state into the file on disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let mut inner = self.lock();
        self.write(&mut inner)
    }

    /// Runs with the lock held, so saves through clones never interleave.
    fn write(&self, inner: &mut Inner) -> Result<(), ConfigError> {
        let mut merged = self.store.load();
        let changed = inner.changed;
        if changed.wallpaper_path {
            merged.preferences.wallpaper_path = inner.state.preferences.wallpaper_path.clone();
        }
        if changed.ringtone_path {
            merged.preferences.ringtone_path = inner.state.preferences.ringtone_path.clone();
        }
        if changed.original_wallpaper {
            merged.original_wallpaper = inner.state.original_wallpaper.clone();
        }
        merged.pomodoro_count = merged.pomodoro_count.max(inner.state.pomodoro_count);

        self.store.save(&merged)?;
        inner.state = merged;
        inner.changed = Changed::default();
        Ok(())
    }
}
