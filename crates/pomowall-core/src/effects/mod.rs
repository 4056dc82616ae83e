//! Desktop side effects triggered by timer transitions.
//!
//! The three collaborators (sound, wallpaper, notifications) sit behind small
//! traits so the dispatcher can be driven by fakes in tests. The `System*`
//! types are the real implementations.

mod audio;
mod dispatcher;
mod log;
mod notify;
mod wallpaper;

pub use audio::{synth_tone_wav, SystemAudio, Tone};
pub use dispatcher::{spawn_dispatcher, EffectToggles, SideEffects, NOTIFICATION_TITLE};
pub use log::{EffectKind, EffectLog, EffectResult, ExecutionStatus};
pub use notify::DesktopNotifier;
pub use wallpaper::SystemWallpaper;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::EffectError;

/// Which audio cue to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CueKind {
    /// Ten seconds left.
    Warning,
    /// Interval finished.
    Finish,
}

impl CueKind {
    /// How many times a custom ringtone is played for this cue.
    pub fn repetitions(self) -> u32 {
        match self {
            CueKind::Warning => 1,
            CueKind::Finish => 3,
        }
    }
}

/// Sets and reports the desktop background.
pub trait WallpaperController: Send + Sync {
    fn set_wallpaper(&self, path: &Path) -> Result<(), EffectError>;

    /// The wallpaper currently shown, if the desktop reports one.
    fn current_wallpaper(&self) -> Result<Option<PathBuf>, EffectError>;

    /// Put back a wallpaper captured earlier with `current_wallpaper`.
    fn restore_wallpaper(&self, saved: &Path) -> Result<(), EffectError> {
        self.set_wallpaper(saved)
    }
}

/// Plays the warning and finish cues.
pub trait AudioPlayer: Send + Sync {
    /// Play `kind` using `custom` when it is set and playable, otherwise the
    /// built-in tone. Blocks until the cue has finished.
    fn play_cue(&self, kind: CueKind, custom: Option<&Path>) -> Result<(), EffectError>;
}

/// Shows a desktop toast.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<(), EffectError>;
}
