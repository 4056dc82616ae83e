//! Recording fakes for the desktop collaborators.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};

use pomowall_core::effects::{AudioPlayer, CueKind, Notifier, WallpaperController};
use pomowall_core::EffectError;

#[derive(Default)]
pub struct RecordingAudio {
    pub plays: Mutex<Vec<CueKind>>,
}

impl AudioPlayer for RecordingAudio {
    fn play_cue(&self, kind: CueKind, _custom: Option<&Path>) -> Result<(), EffectError> {
        self.plays.lock().unwrap().push(kind);
        Ok(())
    }
}

/// Every cue hangs until the sender returned by [`GatedAudio::new`] sends or
/// is dropped.
pub struct GatedAudio {
    pub entered: AtomicUsize,
    pub finished: AtomicUsize,
    gate: Mutex<mpsc::Receiver<()>>,
}

impl GatedAudio {
    pub fn new() -> (Self, mpsc::Sender<()>) {
        let (release, gate) = mpsc::channel();
        let audio = Self {
            entered: AtomicUsize::new(0),
            finished: AtomicUsize::new(0),
            gate: Mutex::new(gate),
        };
        (audio, release)
    }
}

impl AudioPlayer for GatedAudio {
    fn play_cue(&self, _kind: CueKind, _custom: Option<&Path>) -> Result<(), EffectError> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let _ = self.gate.lock().unwrap().recv();
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Panics on the first cue, records the rest.
#[derive(Default)]
pub struct PanickyAudio {
    pub calls: AtomicUsize,
    pub plays: Mutex<Vec<CueKind>>,
}

impl AudioPlayer for PanickyAudio {
    fn play_cue(&self, kind: CueKind, _custom: Option<&Path>) -> Result<(), EffectError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            panic!("audio device vanished");
        }
        self.plays.lock().unwrap().push(kind);
        Ok(())
    }
}

pub struct RecordingWallpaper {
    pub current: Mutex<Option<PathBuf>>,
    pub history: Mutex<Vec<PathBuf>>,
}

impl RecordingWallpaper {
    pub fn showing(path: &str) -> Self {
        Self {
            current: Mutex::new(Some(PathBuf::from(path))),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn shown(&self) -> Option<PathBuf> {
        self.current.lock().unwrap().clone()
    }
}

impl WallpaperController for RecordingWallpaper {
    fn set_wallpaper(&self, path: &Path) -> Result<(), EffectError> {
        *self.current.lock().unwrap() = Some(path.to_path_buf());
        self.history.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn current_wallpaper(&self) -> Result<Option<PathBuf>, EffectError> {
        Ok(self.shown())
    }
}

/// Accepts nothing; every toast fails.
#[derive(Default)]
pub struct BrokenNotifier {
    pub attempts: Mutex<Vec<String>>,
}

impl Notifier for BrokenNotifier {
    fn notify(&self, _title: &str, message: &str) -> Result<(), EffectError> {
        self.attempts.lock().unwrap().push(message.to_string());
        Err(EffectError::Notification("no notification daemon".into()))
    }
}
