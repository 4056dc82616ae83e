//! Side-effect dispatcher.
//!
//! Turns engine events into sound, wallpaper, notification and persistence
//! work. Automatic effects are best-effort: each failure is logged and the
//! remaining effects still run. The manual operations used by front ends
//! return their errors instead.

use std::fmt::Display;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::log::{EffectKind, EffectLog, EffectResult, ExecutionStatus};
use super::{AudioPlayer, CueKind, Notifier, WallpaperController};
use crate::error::EffectError;
use crate::events::TimerEvent;
use crate::storage::{Settings, SharedPreferences};
use crate::timer::Mode;

pub const NOTIFICATION_TITLE: &str = "Pomodoro Timer";

/// User switches for the optional effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectToggles {
    pub sound: bool,
    pub notifications: bool,
}

impl Default for EffectToggles {
    fn default() -> Self {
        Self {
            sound: true,
            notifications: true,
        }
    }
}

impl From<&Settings> for EffectToggles {
    fn from(settings: &Settings) -> Self {
        Self {
            sound: settings.sound.enabled,
            notifications: settings.notifications.enabled,
        }
    }
}

pub struct SideEffects {
    audio: Arc<dyn AudioPlayer>,
    wallpaper: Arc<dyn WallpaperController>,
    notifier: Arc<dyn Notifier>,
    prefs: SharedPreferences,
    toggles: EffectToggles,
    /// Background to come back to after a break. Captured once, before any swap.
    original_wallpaper: Option<PathBuf>,
}

impl SideEffects {
    /// Capture the original wallpaper and wire up the collaborators.
    ///
    /// A wallpaper recorded by an earlier session that never restored it wins
    /// over whatever the desktop shows now.
    pub fn new(
        audio: Arc<dyn AudioPlayer>,
        wallpaper: Arc<dyn WallpaperController>,
        notifier: Arc<dyn Notifier>,
        prefs: SharedPreferences,
        toggles: EffectToggles,
    ) -> Self {
        let original_wallpaper = prefs.original_wallpaper().or_else(|| {
            match wallpaper.current_wallpaper() {
                Ok(current) => current,
                Err(e) => {
                    warn!(error = %e, "cannot read current wallpaper, restore disabled");
                    None
                }
            }
        });
        debug!(original = ?original_wallpaper, "wallpaper session created");

        Self {
            audio,
            wallpaper,
            notifier,
            prefs,
            toggles,
            original_wallpaper,
        }
    }

    pub fn original_wallpaper(&self) -> Option<&PathBuf> {
        self.original_wallpaper.as_ref()
    }

    pub fn preferences(&self) -> &SharedPreferences {
        &self.prefs
    }

    pub fn toggles(&self) -> EffectToggles {
        self.toggles
    }

    /// Run every effect `event` calls for, in order. Never fails.
    pub fn handle(&self, event: &TimerEvent) -> EffectLog {
        match event {
            TimerEvent::Tick { .. } => EffectLog::empty(),
            TimerEvent::Warning { .. } => EffectLog::new(vec![self.play(CueKind::Warning)]),
            TimerEvent::StatsChanged {
                completed_pomodoros,
            } => {
                self.prefs.record_pomodoros(*completed_pomodoros);
                EffectLog::empty()
            }
            TimerEvent::Finished { completed, next } => self.on_finished(*completed, *next),
        }
    }

    fn on_finished(&self, completed: Mode, next: Mode) -> EffectLog {
        let mut results = vec![self.play(CueKind::Finish)];

        results.push(if next.is_break() {
            self.auto_apply_wallpaper()
        } else {
            self.auto_restore_wallpaper()
        });

        let message = if completed == Mode::Work {
            format!(
                "Work complete! {} pomodoros done. Take a break!",
                self.prefs.pomodoro_count()
            )
        } else {
            "Break over! Time to get back to work.".to_string()
        };
        results.push(if self.toggles.notifications {
            outcome(
                EffectKind::Notification,
                self.notifier.notify(NOTIFICATION_TITLE, &message),
            )
        } else {
            skipped(EffectKind::Notification, "notifications disabled")
        });

        results.push(outcome(EffectKind::Persist, self.prefs.save()));

        let log = EffectLog::new(results);
        info!(
            %completed,
            %next,
            succeeded = log.success_count(),
            failed = log.failure_count(),
            "transition effects done"
        );
        log
    }

    fn play(&self, kind: CueKind) -> EffectResult {
        if !self.toggles.sound {
            return skipped(EffectKind::Sound, "sound disabled");
        }
        let ringtone = self.prefs.ringtone_path();
        outcome(
            EffectKind::Sound,
            self.audio.play_cue(kind, ringtone.as_deref()),
        )
    }

    fn auto_apply_wallpaper(&self) -> EffectResult {
        match self.apply_wallpaper() {
            Err(EffectError::NoWallpaperSelected) => {
                skipped(EffectKind::WallpaperApply, "no wallpaper selected")
            }
            other => outcome(EffectKind::WallpaperApply, other),
        }
    }

    fn auto_restore_wallpaper(&self) -> EffectResult {
        if self.prefs.wallpaper_path().is_none() {
            return skipped(EffectKind::WallpaperRestore, "no wallpaper selected");
        }
        match self.restore_wallpaper() {
            Err(EffectError::NoOriginalWallpaper) => {
                skipped(EffectKind::WallpaperRestore, "original wallpaper unknown")
            }
            other => outcome(EffectKind::WallpaperRestore, other),
        }
    }

    // ── Manual operations ────────────────────────────────────────────

    /// Show the chosen break wallpaper now. Returns the path applied.
    pub fn apply_wallpaper(&self) -> Result<PathBuf, EffectError> {
        let path = self
            .prefs
            .wallpaper_path()
            .ok_or(EffectError::NoWallpaperSelected)?;
        if !path.is_file() {
            return Err(EffectError::MissingFile(path));
        }
        self.wallpaper.set_wallpaper(&path)?;
        if let Err(e) = self
            .prefs
            .set_original_wallpaper(self.original_wallpaper.clone())
        {
            warn!(error = %e, "cannot record original wallpaper");
        }
        info!(path = %path.display(), "break wallpaper applied");
        Ok(path)
    }

    /// Put the captured original wallpaper back. Returns the path restored.
    pub fn restore_wallpaper(&self) -> Result<PathBuf, EffectError> {
        let original = self
            .original_wallpaper
            .clone()
            .ok_or(EffectError::NoOriginalWallpaper)?;
        self.wallpaper.restore_wallpaper(&original)?;
        if let Err(e) = self.prefs.set_original_wallpaper(None) {
            warn!(error = %e, "cannot clear recorded wallpaper");
        }
        info!(path = %original.display(), "original wallpaper restored");
        Ok(original)
    }

    /// Play the finish cue with the current ringtone, ignoring the sound toggle.
    pub fn test_ringtone(&self) -> Result<(), EffectError> {
        let ringtone = self.prefs.ringtone_path();
        self.audio.play_cue(CueKind::Finish, ringtone.as_deref())
    }
}

fn outcome<E: Display>(effect: EffectKind, result: Result<impl Sized, E>) -> EffectResult {
    let status = match result {
        Ok(_) => ExecutionStatus::Success,
        Err(e) => {
            warn!(%effect, error = %e, "side effect failed");
            ExecutionStatus::Failed {
                reason: e.to_string(),
            }
        }
    };
    EffectResult { effect, status }
}

fn skipped(effect: EffectKind, reason: &str) -> EffectResult {
    debug!(%effect, reason, "side effect skipped");
    EffectResult {
        effect,
        status: ExecutionStatus::Skipped {
            reason: reason.to_string(),
        },
    }
}

/// Consume `events` in order until every sender is gone.
///
/// Ticks are ignored. Anything that may block runs on the blocking pool so the
/// countdown and the front end stay responsive.
pub fn spawn_dispatcher(
    effects: Arc<SideEffects>,
    mut events: UnboundedReceiver<TimerEvent>,
    runtime: &Handle,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        while let Some(event) = events.recv().await {
            if matches!(event, TimerEvent::Tick { .. }) {
                continue;
            }
            let name = event.type_name();
            let effects = Arc::clone(&effects);
            match tokio::task::spawn_blocking(move || effects.handle(&event)).await {
                Ok(log) => debug!(event = name, effects = log.results.len(), "event handled"),
                Err(e) => warn!(event = name, error = %e, "side-effect job panicked"),
            }
        }
        debug!("dispatcher stopped");
    })
}
