//! Full-length countdown scenarios on a paused tokio clock.
//!
//! With `start_paused` the runtime jumps the clock forward whenever every
//! task is idle, so a 25 minute work interval completes instantly while
//! still producing one tick per virtual second.

use pomowall_core::{Mode, ModeDurations, TimerEngine, TimerEvent};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;

/// Collect events until (and including) the first `Finished`.
async fn run_to_finish(rx: &mut UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let done = matches!(event, TimerEvent::Finished { .. });
        events.push(event);
        if done {
            break;
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn test_full_work_interval() {
    let engine = TimerEngine::new(ModeDurations::default(), Handle::current());
    let mut rx = engine.subscribe();
    assert!(engine.start());

    let events = run_to_finish(&mut rx).await;

    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            TimerEvent::Tick { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks.len(), 1500);
    assert_eq!(ticks.first(), Some(&1499));
    assert_eq!(ticks.last(), Some(&0));
    assert!(ticks.windows(2).all(|w| w[1] == w[0] - 1));

    let warnings: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, TimerEvent::Warning { .. }))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        events[warnings[0] - 1],
        TimerEvent::Tick {
            remaining_secs: 10,
            ..
        }
    ));

    let tail = &events[events.len() - 2..];
    assert_eq!(
        tail,
        [
            TimerEvent::StatsChanged {
                completed_pomodoros: 1
            },
            TimerEvent::Finished {
                completed: Mode::Work,
                next: Mode::ShortBreak
            },
        ]
    );

    let state = engine.state();
    assert_eq!(state.mode, Mode::ShortBreak);
    assert_eq!(state.remaining_secs, 300);
    assert!(!state.running);
    assert!(!state.paused);
    assert_eq!(engine.completed_pomodoros(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_fourth_pomodoro_earns_long_break() {
    let engine =
        TimerEngine::new(ModeDurations::default(), Handle::current()).with_completed_pomodoros(3);
    let mut rx = engine.subscribe();
    engine.start();

    let events = run_to_finish(&mut rx).await;
    assert_eq!(
        events.last(),
        Some(&TimerEvent::Finished {
            completed: Mode::Work,
            next: Mode::LongBreak
        })
    );
    assert_eq!(engine.completed_pomodoros(), 4);
    assert_eq!(engine.state().mode, Mode::LongBreak);
    assert_eq!(engine.state().remaining_secs, 900);
}

#[tokio::test(start_paused = true)]
async fn test_break_returns_to_work_without_counting() {
    let engine = TimerEngine::new(ModeDurations::default(), Handle::current())
        .with_completed_pomodoros(2);
    engine.set_mode(Mode::ShortBreak);
    let mut rx = engine.subscribe();
    engine.start();

    let events = run_to_finish(&mut rx).await;
    assert!(!events
        .iter()
        .any(|e| matches!(e, TimerEvent::StatsChanged { .. })));
    assert_eq!(engine.state().mode, Mode::Work);
    assert_eq!(engine.state().remaining_secs, 1500);
    assert_eq!(engine.completed_pomodoros(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cycle_with_custom_cadence() {
    let durations = ModeDurations {
        work_secs: 3,
        short_break_secs: 2,
        long_break_secs: 4,
        pomodoros_before_long_break: 2,
    };
    let engine = TimerEngine::new(durations, Handle::current());
    let mut rx = engine.subscribe();

    let mut transitions = Vec::new();
    for _ in 0..4 {
        assert!(engine.start());
        if let Some(TimerEvent::Finished { completed, next }) =
            run_to_finish(&mut rx).await.pop()
        {
            transitions.push((completed, next));
        }
    }

    assert_eq!(
        transitions,
        vec![
            (Mode::Work, Mode::ShortBreak),
            (Mode::ShortBreak, Mode::Work),
            (Mode::Work, Mode::LongBreak),
            (Mode::LongBreak, Mode::Work),
        ]
    );
    assert_eq!(engine.completed_pomodoros(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_every_subscriber_sees_the_same_stream() {
    let durations = ModeDurations {
        work_secs: 12,
        ..ModeDurations::default()
    };
    let engine = TimerEngine::new(durations, Handle::current());
    let mut a = engine.subscribe();
    let mut b = engine.subscribe();
    engine.start();

    let from_a = run_to_finish(&mut a).await;
    let from_b = run_to_finish(&mut b).await;
    assert_eq!(from_a, from_b);
    assert_eq!(from_a.len(), 12 + 1 + 2);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_mid_interval_stops_events() {
    let engine = TimerEngine::new(ModeDurations::default(), Handle::current());
    let mut rx = engine.subscribe();
    engine.start();
    for _ in 0..30 {
        rx.recv().await;
    }

    engine.shutdown().await;
    assert!(!engine.is_running());
    let remaining = engine.state().remaining_secs;
    assert_eq!(remaining, 1470);

    tokio::time::sleep(std::time::Duration::from_secs(60)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(engine.state().remaining_secs, remaining);
}
