mod engine;
mod mode;

pub use engine::{
    progress_pct, TimerEngine, TimerSnapshot, TimerState, TICK_INTERVAL, WARNING_AT_SECS,
};
pub use mode::{Mode, ModeDurations, DEFAULT_POMODOROS_BEFORE_LONG_BREAK};
