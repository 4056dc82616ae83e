//! Front-end helpers: text commands and display formatting.
//!
//! Nothing here touches the terminal. Front ends parse a line into a
//! [`Command`], apply it to the engine and print the returned [`Feedback`]
//! and the status line.

use std::fmt;
use std::str::FromStr;

use crate::events::TimerEvent;
use crate::timer::{Mode, TimerEngine, TimerSnapshot};

pub const HELP: &str = "commands: s=start  p=pause/resume  r=reset  w|sb|lb|mode <m>=switch mode  q=quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    TogglePause,
    Reset,
    SetMode(Mode),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim().to_ascii_lowercase();
        let mut words = line.split_whitespace();
        let head = words.next().unwrap_or_default();
        let arg = words.next();

        let command = match (head, arg) {
            ("s" | "start", None) => Command::Start,
            ("p" | "pause" | "resume", None) => Command::TogglePause,
            ("r" | "reset", None) => Command::Reset,
            ("w", None) => Command::SetMode(Mode::Work),
            ("sb", None) => Command::SetMode(Mode::ShortBreak),
            ("lb", None) => Command::SetMode(Mode::LongBreak),
            ("m" | "mode", Some(mode)) => Command::SetMode(mode.parse()?),
            ("m" | "mode", None) => return Err("usage: mode <work|short-break|long-break>".into()),
            ("h" | "help" | "?", None) => Command::Help,
            ("q" | "quit" | "exit", None) => Command::Quit,
            ("", _) => return Err("empty command".into()),
            _ => return Err(format!("unknown command '{}'", s.trim())),
        };
        if words.next().is_some() {
            return Err(format!("unexpected arguments in '{}'", s.trim()));
        }
        Ok(command)
    }
}

/// What happened when a command was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Started(Mode),
    AlreadyRunning,
    Paused,
    Resumed,
    NotRunning,
    Reset(Mode),
    /// Reset and mode switches are disabled while the countdown runs.
    RefusedWhileRunning,
    ModeSet(Mode),
    Help,
    /// The front end decides whether to confirm and exit.
    QuitRequested,
}

impl Command {
    pub fn apply(self, engine: &TimerEngine) -> Feedback {
        match self {
            Command::Start => {
                if engine.start() {
                    Feedback::Started(engine.state().mode)
                } else {
                    Feedback::AlreadyRunning
                }
            }
            Command::TogglePause => match engine.toggle_pause() {
                Some(true) => Feedback::Paused,
                Some(false) => Feedback::Resumed,
                None => Feedback::NotRunning,
            },
            Command::Reset => {
                if engine.is_running() {
                    return Feedback::RefusedWhileRunning;
                }
                engine.reset();
                Feedback::Reset(engine.state().mode)
            }
            Command::SetMode(mode) => {
                if engine.set_mode(mode) {
                    Feedback::ModeSet(mode)
                } else {
                    Feedback::RefusedWhileRunning
                }
            }
            Command::Help => Feedback::Help,
            Command::Quit => Feedback::QuitRequested,
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Started(mode) => write!(f, "{} started", mode.label()),
            Feedback::AlreadyRunning => f.write_str("already running"),
            Feedback::Paused => f.write_str("paused"),
            Feedback::Resumed => f.write_str("resumed"),
            Feedback::NotRunning => f.write_str("timer is not running"),
            Feedback::Reset(mode) => write!(f, "{} reset", mode.label()),
            Feedback::RefusedWhileRunning => f.write_str("stop the timer first (not allowed while running)"),
            Feedback::ModeSet(mode) => write!(f, "mode: {}", mode.label()),
            Feedback::Help => f.write_str(HELP),
            Feedback::QuitRequested => f.write_str("quit"),
        }
    }
}

/// `mm:ss`; minutes grow past two digits for very long intervals.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

pub fn progress_bar(progress_pct: f64, width: usize) -> String {
    let ratio = (progress_pct / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// One line summarising the engine, e.g.
/// `Work        24:59 [#-------------------]   0% | 3 done`.
pub fn status_line(snapshot: &TimerSnapshot) -> String {
    let flag = if snapshot.paused {
        " (paused)"
    } else if !snapshot.running {
        " (stopped)"
    } else {
        ""
    };
    format!(
        "{:<11} {} {} {:>3.0}% | {} done{}",
        snapshot.mode.label(),
        format_clock(snapshot.remaining_secs),
        progress_bar(snapshot.progress_pct, 20),
        snapshot.progress_pct,
        snapshot.completed_pomodoros,
        flag
    )
}

/// Message worth printing on its own line, if any. Ticks only update the
/// status line.
pub fn describe_event(event: &TimerEvent) -> Option<String> {
    match event {
        TimerEvent::Tick { .. } => None,
        TimerEvent::Warning { mode } => Some(format!("{}: 10 seconds left", mode.label())),
        TimerEvent::Finished { completed, next } => Some(format!(
            "{} finished, next up: {}",
            completed.label(),
            next.label()
        )),
        TimerEvent::StatsChanged {
            completed_pomodoros,
        } => Some(format!("pomodoros completed: {completed_pomodoros}")),
    }
}
