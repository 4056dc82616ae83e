use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every observable change of the countdown produces an Event.
/// The front end renders them; the dispatcher turns some into side effects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// One second elapsed while running and not paused.
    Tick {
        remaining_secs: u64,
        mode: Mode,
        progress_pct: f64,
    },
    /// Ten seconds left in the current interval.
    Warning { mode: Mode },
    /// The countdown reached zero. The engine has already moved to `next`.
    Finished { completed: Mode, next: Mode },
    /// The lifetime pomodoro count changed.
    StatsChanged { completed_pomodoros: u64 },
}

impl TimerEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            TimerEvent::Tick { .. } => "tick",
            TimerEvent::Warning { .. } => "warning",
            TimerEvent::Finished { .. } => "finished",
            TimerEvent::StatsChanged { .. } => "stats_changed",
        }
    }
}
