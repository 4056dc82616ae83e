//! Timer engine implementation.
//!
//! The engine owns the countdown state and runs at most one countdown task on
//! the tokio runtime it was built with. Commands are plain synchronous calls
//! that take a short lock; the countdown task is the only place the per-second
//! decrement happens. Everything observable is published as a [`TimerEvent`]
//! to every subscriber.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           +-- remaining hits 0 --> Idle (next mode, full duration)
//!           +-- reset / shutdown ---> Idle (same mode, full duration)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let engine = TimerEngine::new(ModeDurations::default(), Handle::current());
//! let mut events = engine.subscribe();
//! engine.start();
//! while let Some(event) = events.recv().await { /* render */ }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::mode::{Mode, ModeDurations};
use crate::events::TimerEvent;

/// Wall-clock time between two decrements.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Remaining seconds at which the one-off warning fires.
pub const WARNING_AT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_secs: u64,
    pub running: bool,
    /// Only meaningful while `running`; always false otherwise.
    pub paused: bool,
}

/// Read-only view of the engine for front ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub progress_pct: f64,
    pub running: bool,
    pub paused: bool,
    pub completed_pomodoros: u64,
}

/// Percentage of `total` already elapsed when `remaining` is left.
pub fn progress_pct(total: u64, remaining: u64) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let elapsed = total.saturating_sub(remaining);
    elapsed as f64 / total as f64 * 100.0
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

struct Inner {
    state: TimerState,
    completed_pomodoros: u64,
    subscribers: Vec<mpsc::UnboundedSender<TimerEvent>>,
    /// Token of the active countdown, `None` when no loop should be running.
    loop_token: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

impl Inner {
    fn emit(&mut self, event: TimerEvent) {
        trace!(event = event.type_name(), "emit");
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

struct Shared {
    durations: ModeDurations,
    inner: Mutex<Inner>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        // State stays consistent between statements, so a poisoned lock is
        // still safe to reuse.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One second of countdown. Caller holds the lock.
    fn advance_one_second(&self, inner: &mut Inner) -> Step {
        inner.state.remaining_secs = inner.state.remaining_secs.saturating_sub(1);
        let mode = inner.state.mode;
        let remaining = inner.state.remaining_secs;
        let total = self.durations.duration_of(mode);

        inner.emit(TimerEvent::Tick {
            remaining_secs: remaining,
            mode,
            progress_pct: progress_pct(total, remaining),
        });

        if remaining == WARNING_AT_SECS {
            debug!(%mode, "ten seconds left");
            inner.emit(TimerEvent::Warning { mode });
        }

        if remaining == 0 {
            self.finish(inner);
            return Step::Stop;
        }
        Step::Continue
    }

    /// Stop the countdown and move to the next mode in one critical section,
    /// so no `start()` can slip in between.
    fn finish(&self, inner: &mut Inner) {
        let completed = inner.state.mode;
        inner.state.running = false;
        inner.state.paused = false;
        inner.loop_token = None;

        if completed == Mode::Work {
            inner.completed_pomodoros += 1;
        }
        let next = self
            .durations
            .next_mode_after(completed, inner.completed_pomodoros);
        inner.state.mode = next;
        inner.state.remaining_secs = self.durations.duration_of(next);

        info!(
            %completed,
            %next,
            completed_pomodoros = inner.completed_pomodoros,
            "interval finished"
        );
        // Stats go first so subscribers handling `Finished` see the new count.
        if completed == Mode::Work {
            let completed_pomodoros = inner.completed_pomodoros;
            inner.emit(TimerEvent::StatsChanged {
                completed_pomodoros,
            });
        }
        inner.emit(TimerEvent::Finished { completed, next });
    }
}

async fn countdown(shared: Arc<Shared>, token: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let step = {
            let mut inner = shared.lock();
            if token.is_cancelled() || !inner.state.running {
                Step::Stop
            } else if inner.state.paused {
                Step::Continue
            } else {
                shared.advance_one_second(&mut inner)
            }
        };
        if step == Step::Stop {
            break;
        }
    }
    debug!("countdown loop exited");
}

/// Core timer engine.
///
/// One instance per process. Dropping it cancels any running countdown.
pub struct TimerEngine {
    shared: Arc<Shared>,
    runtime: Handle,
    lifetime: CancellationToken,
}

impl TimerEngine {
    /// Create an idle engine in Work mode with the full work duration.
    ///
    /// Countdown tasks are spawned on `runtime`, which lets commands be issued
    /// from threads that are not themselves inside the runtime.
    pub fn new(durations: ModeDurations, runtime: Handle) -> Self {
        let mode = Mode::Work;
        Self {
            shared: Arc::new(Shared {
                durations,
                inner: Mutex::new(Inner {
                    state: TimerState {
                        mode,
                        remaining_secs: durations.duration_of(mode),
                        running: false,
                        paused: false,
                    },
                    completed_pomodoros: 0,
                    subscribers: Vec::new(),
                    loop_token: None,
                    task: None,
                }),
            }),
            runtime,
            lifetime: CancellationToken::new(),
        }
    }

    /// Seed the lifetime pomodoro count loaded from disk.
    pub fn with_completed_pomodoros(self, completed: u64) -> Self {
        self.shared.lock().completed_pomodoros = completed;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.shared.lock().state
    }

    pub fn durations(&self) -> ModeDurations {
        self.shared.durations
    }

    pub fn completed_pomodoros(&self) -> u64 {
        self.shared.lock().completed_pomodoros
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().state.running
    }

    /// Whether a countdown task is still alive (running or winding down).
    pub fn has_active_loop(&self) -> bool {
        self.shared
            .lock()
            .task
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let inner = self.shared.lock();
        let total = self.shared.durations.duration_of(inner.state.mode);
        TimerSnapshot {
            mode: inner.state.mode,
            remaining_secs: inner.state.remaining_secs,
            total_secs: total,
            progress_pct: progress_pct(total, inner.state.remaining_secs),
            running: inner.state.running,
            paused: inner.state.paused,
            completed_pomodoros: inner.completed_pomodoros,
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.shared.lock().subscribers.push(tx);
        rx
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the countdown. Returns `false` (and changes nothing) when a
    /// countdown is already running or the engine has been shut down.
    pub fn start(&self) -> bool {
        let mut inner = self.shared.lock();
        if inner.state.running {
            debug!("start ignored: already running");
            return false;
        }
        if self.lifetime.is_cancelled() {
            warn!("start ignored: engine is shut down");
            return false;
        }

        inner.state.running = true;
        inner.state.paused = false;
        let token = self.lifetime.child_token();
        inner.loop_token = Some(token.clone());
        inner.task = Some(self.runtime.spawn(countdown(Arc::clone(&self.shared), token)));

        info!(
            mode = %inner.state.mode,
            remaining_secs = inner.state.remaining_secs,
            "timer started"
        );
        true
    }

    /// Flip between paused and running. Returns the new `paused` flag, or
    /// `None` when the timer is not running.
    pub fn toggle_pause(&self) -> Option<bool> {
        let mut inner = self.shared.lock();
        if !inner.state.running {
            return None;
        }
        inner.state.paused = !inner.state.paused;
        debug!(paused = inner.state.paused, "pause toggled");
        Some(inner.state.paused)
    }

    pub fn pause(&self) -> bool {
        self.set_paused(true)
    }

    pub fn resume(&self) -> bool {
        self.set_paused(false)
    }

    fn set_paused(&self, paused: bool) -> bool {
        let mut inner = self.shared.lock();
        if !inner.state.running || inner.state.paused == paused {
            return false;
        }
        inner.state.paused = paused;
        debug!(paused, "pause changed");
        true
    }

    /// Back to the full duration of the current mode, stopping any countdown.
    pub fn reset(&self) {
        let mut inner = self.shared.lock();
        if let Some(token) = inner.loop_token.take() {
            token.cancel();
        }
        let mode = inner.state.mode;
        inner.state = TimerState {
            mode,
            remaining_secs: self.shared.durations.duration_of(mode),
            running: false,
            paused: false,
        };
        debug!(%mode, "timer reset");
    }

    /// Switch mode while idle. Returns `false` when ignored because running.
    pub fn set_mode(&self, mode: Mode) -> bool {
        let mut inner = self.shared.lock();
        if inner.state.running {
            debug!(%mode, "set_mode ignored: running");
            return false;
        }
        inner.state.mode = mode;
        inner.state.remaining_secs = self.shared.durations.duration_of(mode);
        debug!(%mode, "mode set");
        true
    }

    /// Cancel the countdown for good and wait for its task to exit.
    ///
    /// After this `start()` is a no-op.
    pub async fn shutdown(&self) {
        self.lifetime.cancel();
        let task = {
            let mut inner = self.shared.lock();
            inner.loop_token = None;
            inner.state.running = false;
            inner.state.paused = false;
            inner.task.take()
        };
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "countdown task ended abnormally");
            }
        }
        info!("timer engine shut down");
    }
}

impl Drop for TimerEngine {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn engine() -> TimerEngine {
        TimerEngine::new(ModeDurations::default(), Handle::current())
    }

    async fn next_tick(rx: &mut mpsc::UnboundedReceiver<TimerEvent>) -> u64 {
        loop {
            match rx.recv().await {
                Some(TimerEvent::Tick { remaining_secs, .. }) => return remaining_secs,
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_in_work_mode() {
        let engine = engine();
        let state = engine.state();
        assert_eq!(state.mode, Mode::Work);
        assert_eq!(state.remaining_secs, 1500);
        assert!(!state.running);
        assert!(!state.paused);
    }

    #[tokio::test(start_paused = true)]
    async fn set_mode_sets_full_duration() {
        let engine = engine();
        for mode in Mode::ALL {
            assert!(engine.set_mode(mode));
            assert_eq!(engine.state().mode, mode);
            assert_eq!(
                engine.state().remaining_secs,
                ModeDurations::default().duration_of(mode)
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn set_mode_ignored_while_running() {
        let engine = engine();
        engine.start();
        assert!(!engine.set_mode(Mode::LongBreak));
        assert_eq!(engine.state().mode, Mode::Work);
        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn double_start_runs_one_loop() {
        let engine = engine();
        let mut rx = engine.subscribe();
        assert!(engine.start());
        assert!(!engine.start());

        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(engine.state().remaining_secs, 1495);

        let mut ticks = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, TimerEvent::Tick { .. }) {
                ticks += 1;
            }
        }
        assert_eq!(ticks, 5);
        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_decrease_by_one() {
        let engine = engine();
        let mut rx = engine.subscribe();
        engine.start();
        let mut last = 1500;
        for _ in 0..20 {
            let remaining = next_tick(&mut rx).await;
            assert_eq!(remaining, last - 1);
            last = remaining;
        }
        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn pause_freezes_and_resume_continues() {
        let engine = engine();
        let mut rx = engine.subscribe();
        engine.start();
        for _ in 0..3 {
            next_tick(&mut rx).await;
        }
        assert_eq!(engine.toggle_pause(), Some(true));
        assert!(engine.state().paused);

        sleep(Duration::from_secs(10)).await;
        assert_eq!(engine.state().remaining_secs, 1497);
        assert!(rx.try_recv().is_err());

        assert!(engine.resume());
        assert_eq!(next_tick(&mut rx).await, 1496);
        engine.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn pause_is_noop_when_idle() {
        let engine = engine();
        assert_eq!(engine.toggle_pause(), None);
        assert!(!engine.pause());
        assert!(!engine.state().paused);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_running_loop() {
        let engine = engine();
        let mut rx = engine.subscribe();
        engine.start();
        next_tick(&mut rx).await;

        engine.reset();
        let state = engine.state();
        assert!(!state.running);
        assert!(!state.paused);
        assert_eq!(state.remaining_secs, 1500);

        sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(!engine.has_active_loop());
        assert_eq!(engine.state().remaining_secs, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn warning_fires_once_at_ten_seconds() {
        let durations = ModeDurations {
            short_break_secs: 12,
            ..ModeDurations::default()
        };
        let engine = TimerEngine::new(durations, Handle::current());
        engine.set_mode(Mode::ShortBreak);
        let mut rx = engine.subscribe();
        engine.start();

        let mut warnings = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                TimerEvent::Warning { mode } => warnings.push(mode),
                TimerEvent::Finished { .. } => break,
                _ => {}
            }
        }
        assert_eq!(warnings, vec![Mode::ShortBreak]);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_shutdown_is_ignored() {
        let engine = engine();
        engine.start();
        engine.shutdown().await;
        assert!(!engine.is_running());
        assert!(!engine.start());
        assert!(!engine.has_active_loop());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_subscriber_is_pruned() {
        let engine = engine();
        let rx = engine.subscribe();
        drop(rx);
        let mut live = engine.subscribe();
        engine.start();
        assert_eq!(next_tick(&mut live).await, 1499);
        assert_eq!(engine.shared.lock().subscribers.len(), 1);
        engine.shutdown().await;
    }

    #[test]
    fn progress_pct_bounds() {
        assert_eq!(progress_pct(1500, 1500), 0.0);
        assert_eq!(progress_pct(1500, 0), 100.0);
        assert_eq!(progress_pct(300, 150), 50.0);
        assert_eq!(progress_pct(0, 0), 100.0);
    }
}
