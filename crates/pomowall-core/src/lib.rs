//! # Pomowall Core Library
//!
//! This library provides the core logic for the pomowall Pomodoro timer: the
//! work/break state machine, its background countdown, and the desktop side
//! effects (sound, wallpaper swap, notification, persistence) triggered when
//! an interval ends. Front ends such as the `pomowall` CLI stay thin layers
//! over the same engine.
//!
//! ## Architecture
//!
//! - **Timer**: mode policy plus an async countdown engine driven by a tokio
//!   interval. Commands are synchronous; observable changes go out as events.
//! - **Effects**: capability traits for audio, wallpaper and notifications,
//!   their system implementations, and the dispatcher that runs them off the
//!   countdown task.
//! - **Storage**: `state.json` for preferences and the lifetime pomodoro
//!   count, `config.toml` for schedule and toggles.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`SideEffects`]: per-transition effect runner
//! - [`ConfigStore`]: atomic persistence of [`PersistedState`]
//! - [`Settings`]: user configuration

pub mod effects;
pub mod error;
pub mod events;
pub mod presentation;
pub mod storage;
pub mod timer;

pub use effects::{spawn_dispatcher, EffectToggles, SideEffects};
pub use error::{ConfigError, CoreError, EffectError};
pub use events::TimerEvent;
pub use storage::{ConfigStore, PersistedState, Preferences, Settings, SharedPreferences};
pub use timer::{Mode, ModeDurations, TimerEngine, TimerSnapshot, TimerState};
