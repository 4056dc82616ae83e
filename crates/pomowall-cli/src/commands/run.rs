use std::io::{BufRead, Write};

use clap::Args;
use pomowall_core::presentation::{describe_event, status_line, Command, Feedback, HELP};
use pomowall_core::storage::{Settings, SharedPreferences};
use pomowall_core::{spawn_dispatcher, Mode, TimerEngine, TimerEvent, TimerSnapshot};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{open_preferences, system_effects, CmdResult};

#[derive(Args)]
pub struct RunArgs {
    /// Mode to begin in (work, short-break, long-break)
    #[arg(long)]
    mode: Option<Mode>,
    /// Start counting down right away
    #[arg(long)]
    start: bool,
}

pub fn run(args: RunArgs) -> CmdResult {
    let settings = Settings::load_or_default();
    let prefs = open_preferences()?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(args, settings, prefs))
}

/// Lines typed by the user. The reader thread ends with stdin.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_status(snapshot: &TimerSnapshot) {
    let mut out = std::io::stdout().lock();
    let _ = write!(out, "\r{}  ", status_line(snapshot));
    let _ = out.flush();
}

fn print_line(message: impl std::fmt::Display) {
    println!("\r{message}");
}

async fn session(args: RunArgs, settings: Settings, prefs: SharedPreferences) -> CmdResult {
    let handle = Handle::current();
    let effects = system_effects(prefs.clone(), &settings)?;
    let engine = TimerEngine::new(settings.durations(), handle.clone())
        .with_completed_pomodoros(prefs.pomodoro_count());
    let dispatcher = spawn_dispatcher(effects, engine.subscribe(), &handle);
    let mut events = engine.subscribe();

    if let Some(mode) = args.mode {
        engine.set_mode(mode);
    }
    println!("{HELP}");
    if args.start {
        print_line(Command::Start.apply(&engine));
    }
    print_status(&engine.snapshot());

    let mut input = spawn_stdin_reader();
    let mut input_open = true;
    let mut confirming_quit = false;

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if let Some(message) = describe_event(&event) {
                    print_line(message);
                }
                print_status(&engine.snapshot());
                // With stdin gone the session ends once the interval is announced.
                if !input_open && matches!(event, TimerEvent::Finished { .. }) {
                    break;
                }
            }
            line = input.recv(), if input_open => {
                let Some(line) = line else {
                    debug!("stdin closed");
                    input_open = false;
                    if engine.is_running() {
                        continue;
                    }
                    break;
                };
                let line = line.trim();

                if confirming_quit {
                    confirming_quit = false;
                    if matches!(line.to_ascii_lowercase().as_str(), "y" | "yes") {
                        break;
                    }
                    print_line("still running");
                } else if !line.is_empty() {
                    match line.parse::<Command>() {
                        Ok(command) => match command.apply(&engine) {
                            Feedback::QuitRequested if engine.is_running() => {
                                print_line("the timer is running, quit anyway? [y/N]");
                                confirming_quit = true;
                            }
                            Feedback::QuitRequested => break,
                            feedback => print_line(feedback),
                        },
                        Err(e) => print_line(e),
                    }
                }
                print_status(&engine.snapshot());
            }
        }
    }
    println!();

    engine.shutdown().await;
    let completed = engine.completed_pomodoros();
    // The engine owns the dispatcher's sender; dropping it lets the queue drain.
    drop(engine);
    if let Err(e) = dispatcher.await {
        warn!(error = %e, "dispatcher ended abnormally");
    }

    prefs.record_pomodoros(completed);
    if let Err(e) = prefs.save() {
        eprintln!("warning: {e}");
    }
    if prefs.original_wallpaper().is_some() {
        println!("break wallpaper still shown; `pomowall wallpaper restore` puts the old one back");
    }
    println!("{completed} pomodoros completed");
    Ok(())
}
