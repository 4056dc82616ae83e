//! Audio cues through the platform's command-line player.
//!
//! Custom ringtones are handed to the player as-is. The built-in cues are
//! short sine beeps rendered to WAV once and cached in the data directory.
//! When no player works the terminal bell is the last resort.

use std::f64::consts::PI;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::{AudioPlayer, CueKind};
use crate::error::EffectError;

const SAMPLE_RATE: u32 = 22_050;
/// Pause between repetitions of a custom ringtone.
const CUSTOM_GAP: Duration = Duration::from_millis(500);
/// Fade in/out so beeps do not click.
const FADE_MS: u32 = 5;

/// A built-in beep pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u32,
    pub repetitions: u32,
    pub gap_ms: u32,
}

impl Tone {
    /// Finish: three short beeps. Warning: one longer, higher beep.
    pub fn for_cue(kind: CueKind) -> Self {
        match kind {
            CueKind::Finish => Tone {
                frequency_hz: 800,
                duration_ms: 300,
                repetitions: 3,
                gap_ms: 200,
            },
            CueKind::Warning => Tone {
                frequency_hz: 1000,
                duration_ms: 200,
                repetitions: 1,
                gap_ms: 0,
            },
        }
    }

    fn file_name(&self) -> String {
        format!("tone-{}hz-{}ms.wav", self.frequency_hz, self.duration_ms)
    }
}

/// Render a mono 16-bit PCM WAV file holding one sine beep.
pub fn synth_tone_wav(frequency_hz: u32, duration_ms: u32) -> Vec<u8> {
    let samples = SAMPLE_RATE * duration_ms / 1000;
    let fade = (SAMPLE_RATE * FADE_MS / 1000).max(1);
    let data_len = samples * 2;

    let mut wav = Vec::with_capacity(44 + data_len as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());

    for i in 0..samples {
        let edge = i.min(samples - 1 - i);
        let envelope = (f64::from(edge) / f64::from(fade)).min(1.0);
        let t = f64::from(i) / f64::from(SAMPLE_RATE);
        let value = (2.0 * PI * f64::from(frequency_hz) * t).sin() * envelope * 0.5;
        let sample = (value * f64::from(i16::MAX)) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }
    wav
}

/// Plays cues with `paplay`/`pw-play`/`aplay` on Linux, `afplay` on macOS and
/// PowerShell's `SoundPlayer` on Windows.
#[derive(Debug, Clone)]
pub struct SystemAudio {
    cache_dir: PathBuf,
}

impl SystemAudio {
    /// `cache_dir` receives the rendered built-in tones.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    fn tone_file(&self, tone: &Tone) -> Result<PathBuf, EffectError> {
        let path = self.cache_dir.join(tone.file_name());
        if path.exists() {
            return Ok(path);
        }
        std::fs::create_dir_all(&self.cache_dir)
            .and_then(|_| std::fs::write(&path, synth_tone_wav(tone.frequency_hz, tone.duration_ms)))
            .map_err(|e| EffectError::Audio(format!("cannot write tone file: {e}")))?;
        Ok(path)
    }

    fn play_custom(&self, path: &Path, kind: CueKind) -> Result<(), EffectError> {
        let plays = kind.repetitions();
        for i in 0..plays {
            play_file(path)?;
            if i + 1 < plays {
                thread::sleep(CUSTOM_GAP);
            }
        }
        Ok(())
    }

    fn play_tone(&self, kind: CueKind) -> Result<(), EffectError> {
        let tone = Tone::for_cue(kind);
        let played = self.tone_file(&tone).and_then(|path| {
            for i in 0..tone.repetitions {
                play_file(&path)?;
                if i + 1 < tone.repetitions {
                    thread::sleep(Duration::from_millis(u64::from(tone.gap_ms)));
                }
            }
            Ok(())
        });

        if let Err(e) = played {
            debug!(error = %e, "no audio player, ringing terminal bell");
            ring_bell(tone.repetitions, Duration::from_millis(u64::from(tone.gap_ms)));
        }
        Ok(())
    }
}

impl AudioPlayer for SystemAudio {
    fn play_cue(&self, kind: CueKind, custom: Option<&Path>) -> Result<(), EffectError> {
        match custom {
            Some(path) if path.is_file() => match self.play_custom(path, kind) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "custom ringtone failed, using built-in tone");
                }
            },
            Some(path) => {
                warn!(path = %path.display(), "custom ringtone missing, using built-in tone");
            }
            None => {}
        }
        self.play_tone(kind)
    }
}

fn ring_bell(times: u32, gap: Duration) {
    let mut stderr = std::io::stderr();
    for i in 0..times {
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
        if i + 1 < times {
            thread::sleep(gap);
        }
    }
}

/// Run `program` to completion, treating a missing binary as `Ok(false)`.
#[cfg(unix)]
fn run_player(program: &str, args: &[&str], path: &Path) -> Result<bool, EffectError> {
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(status) if status.success() => Ok(true),
        Ok(status) => Err(EffectError::Audio(format!("{program} exited with {status}"))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(EffectError::Audio(format!("{program}: {e}"))),
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn play_file(path: &Path) -> Result<(), EffectError> {
    const PLAYERS: &[(&str, &[&str])] = &[("paplay", &[]), ("pw-play", &[]), ("aplay", &["-q"])];

    let mut last_error = None;
    for (program, args) in PLAYERS {
        match run_player(program, args, path) {
            Ok(true) => return Ok(()),
            Ok(false) => continue,
            Err(e) => last_error = Some(e),
        }
    }
    Err(last_error.unwrap_or_else(|| EffectError::Audio("no audio player found".into())))
}

#[cfg(target_os = "macos")]
fn play_file(path: &Path) -> Result<(), EffectError> {
    if run_player("afplay", &[], path)? {
        Ok(())
    } else {
        Err(EffectError::Audio("afplay not found".into()))
    }
}

#[cfg(windows)]
fn play_file(path: &Path) -> Result<(), EffectError> {
    let script = format!(
        "(New-Object Media.SoundPlayer '{}').PlaySync()",
        path.display().to_string().replace('\'', "''")
    );
    let status = Command::new("powershell")
        .args(["-NoProfile", "-NonInteractive", "-Command", &script])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| EffectError::Audio(format!("powershell: {e}")))?;
    if status.success() {
        Ok(())
    } else {
        Err(EffectError::Audio(format!("powershell exited with {status}")))
    }
}

#[cfg(not(any(unix, windows)))]
fn play_file(_path: &Path) -> Result<(), EffectError> {
    Err(EffectError::Unsupported("audio playback"))
}
