use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work pomodoros between long breaks when nothing else is configured.
pub const DEFAULT_POMODOROS_BEFORE_LONG_BREAK: u32 = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Work,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Work, Mode::ShortBreak, Mode::LongBreak];

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Work)
    }

    /// Human-readable label used by front ends.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Work",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::ShortBreak => "short-break",
            Mode::LongBreak => "long-break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" | "w" | "focus" => Ok(Mode::Work),
            "short-break" | "short_break" | "short" | "sb" => Ok(Mode::ShortBreak),
            "long-break" | "long_break" | "long" | "lb" => Ok(Mode::LongBreak),
            other => Err(format!(
                "unknown mode '{other}' (expected work, short-break or long-break)"
            )),
        }
    }
}

/// Per-mode durations and the long-break cadence.
///
/// Durations are whole seconds. A zero duration is allowed but makes the
/// countdown finish on its first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub work_secs: u64,
    pub short_break_secs: u64,
    pub long_break_secs: u64,
    pub pomodoros_before_long_break: u32,
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            work_secs: 25 * 60,
            short_break_secs: 5 * 60,
            long_break_secs: 15 * 60,
            pomodoros_before_long_break: DEFAULT_POMODOROS_BEFORE_LONG_BREAK,
        }
    }
}

impl ModeDurations {
    pub fn duration_of(&self, mode: Mode) -> u64 {
        match mode {
            Mode::Work => self.work_secs,
            Mode::ShortBreak => self.short_break_secs,
            Mode::LongBreak => self.long_break_secs,
        }
    }

    /// Mode that follows `mode` once its countdown has finished.
    ///
    /// `completed_count` is the pomodoro total *after* counting the interval
    /// that just finished.
    pub fn next_mode_after(&self, mode: Mode, completed_count: u64) -> Mode {
        match mode {
            Mode::Work => {
                let every = match self.pomodoros_before_long_break {
                    0 => DEFAULT_POMODOROS_BEFORE_LONG_BREAK,
                    n => n,
                };
                if completed_count % u64::from(every) == 0 {
                    Mode::LongBreak
                } else {
                    Mode::ShortBreak
                }
            }
            Mode::ShortBreak | Mode::LongBreak => Mode::Work,
        }
    }
}
