pub mod config;
pub mod ringtone;
pub mod run;
pub mod stats;
pub mod wallpaper;

use std::sync::Arc;
use std::time::Duration;

use pomowall_core::effects::{DesktopNotifier, SystemAudio, SystemWallpaper};
use pomowall_core::storage::{data_dir, ConfigStore, Settings, SharedPreferences};
use pomowall_core::error::Result;
use pomowall_core::{EffectToggles, SideEffects};

pub type CmdResult = Result<()>;

/// Preferences from `state.json` in the data directory.
pub fn open_preferences() -> Result<SharedPreferences> {
    Ok(SharedPreferences::load(ConfigStore::open()?))
}

/// Real desktop collaborators configured from `settings`.
pub fn system_effects(
    prefs: SharedPreferences,
    settings: &Settings,
) -> Result<Arc<SideEffects>> {
    let sounds = data_dir()?.join("sounds");
    Ok(Arc::new(SideEffects::new(
        Arc::new(SystemAudio::new(sounds)),
        Arc::new(SystemWallpaper::new()),
        Arc::new(DesktopNotifier::new(Duration::from_secs(u64::from(
            settings.notifications.duration_secs,
        )))),
        prefs,
        EffectToggles::from(settings),
    )))
}
