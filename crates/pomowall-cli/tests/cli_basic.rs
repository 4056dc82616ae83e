//! Basic CLI E2E tests.
//!
//! Tests run the built binary against a throwaway data directory and verify
//! outputs and the files it leaves behind.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

struct Cli {
    home: tempfile::TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            home: tempfile::tempdir().unwrap(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_pomowall"));
        cmd.args(args)
            .env("POMOWALL_HOME", self.home.path())
            .env("POMOWALL_LOG", "off");
        cmd
    }

    /// Run a CLI command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        self.run_with_input(args, "")
    }

    fn run_with_input(&self, args: &[&str], input: &str) -> (String, String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to execute CLI command");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        (stdout, stderr, code)
    }

    fn state(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(self.home.path().join("state.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn file(&self, name: &str) -> std::path::PathBuf {
        let path = self.home.path().join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_stats_start_at_zero() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["stats"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("completed pomodoros: 0"));
}

#[test]
fn test_stats_json() {
    let cli = Cli::new();
    std::fs::write(
        cli.home.path().join("state.json"),
        r#"{"wallpaper_path": null, "ringtone_path": null, "pomodoro_count": 7}"#,
    )
    .unwrap();

    let (stdout, _, code) = cli.run(&["stats", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["pomodoro_count"], 7);
}

#[test]
fn test_ringtone_set_and_clear() {
    let cli = Cli::new();
    let tone = cli.file("bell.wav");

    let (_, _, code) = cli.run(&["ringtone", "set", path_arg(&tone)]);
    assert_eq!(code, 0);
    let saved = cli.state()["ringtone_path"].as_str().unwrap().to_string();
    assert!(saved.ends_with("bell.wav"));

    let (stdout, _, code) = cli.run(&["ringtone", "clear"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("playing the built-in beeps"));
    assert!(cli.state()["ringtone_path"].is_null());
}

#[test]
fn test_ringtone_clear_stays_quiet_with_sound_off() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["config", "set", "sound.enabled", "false"]);
    assert_eq!(code, 0);

    let (stdout, stderr, code) = cli.run(&["ringtone", "clear"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sound is off"));
    assert!(stderr.is_empty());
}

#[test]
fn test_wallpaper_set_rejects_missing_file() {
    let cli = Cli::new();
    let missing = cli.home.path().join("nope.png");
    let (_, stderr, code) = cli.run(&["wallpaper", "set", path_arg(&missing)]);
    assert_ne!(code, 0);
    assert!(stderr.contains("File does not exist"));
}

#[test]
fn test_wallpaper_set_and_show() {
    let cli = Cli::new();
    let image = cli.file("forest.png");

    let (_, _, code) = cli.run(&["wallpaper", "set", path_arg(&image)]);
    assert_eq!(code, 0);
    let (stdout, _, code) = cli.run(&["wallpaper", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("forest.png"));
}

#[test]
fn test_wallpaper_apply_without_selection_warns() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["wallpaper", "apply"]);
    assert_eq!(code, 0);
    assert!(stderr.contains("warning: No wallpaper selected"));
}

#[test]
fn test_config_get_set_reset() {
    let cli = Cli::new();

    let (stdout, _, code) = cli.run(&["config", "get", "schedule.focus_duration"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "25");

    let (_, _, code) = cli.run(&["config", "set", "schedule.focus_duration", "50"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "schedule.focus_duration"]);
    assert_eq!(stdout.trim(), "50");

    let (_, _, code) = cli.run(&["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "schedule.focus_duration"]);
    assert_eq!(stdout.trim(), "25");
}

#[test]
fn test_config_rejects_bad_input() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["config", "get", "ui.theme"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("Unknown configuration key: ui.theme"));

    let (_, _, code) = cli.run(&["config", "set", "schedule.short_break", "soon"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_list() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("notifications.duration_secs = 5"));
    assert!(stdout.contains("sound.enabled = true"));
}

#[test]
fn test_run_quits_when_idle() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run_with_input(&["run"], "q\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("25:00"));
    assert!(stdout.contains("0 pomodoros completed"));
    assert_eq!(cli.state()["pomodoro_count"], 0);
}

#[test]
fn test_run_switches_mode() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run_with_input(&["run"], "lb\nq\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("mode: Long Break"));
    assert!(stdout.contains("15:00"));
}

#[test]
fn test_run_asks_before_quitting_while_running() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run_with_input(&["run", "--start"], "r\nq\ny\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Work started"));
    assert!(stdout.contains("not allowed while running"));
    assert!(stdout.contains("quit anyway?"));
}

#[test]
fn test_run_announces_finish_after_stdin_closes() {
    let cli = Cli::new();
    for (key, value) in [
        ("schedule.focus_duration", "0"),
        ("sound.enabled", "false"),
        ("notifications.enabled", "false"),
    ] {
        let (_, _, code) = cli.run(&["config", "set", key, value]);
        assert_eq!(code, 0);
    }

    // No input at all: the zero-minute interval finishes on the first tick.
    let (stdout, _, code) = cli.run(&["run", "--start"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Work finished, next up: Short Break"));
    assert!(stdout.contains("1 pomodoros completed"));
    assert_eq!(cli.state()["pomodoro_count"], 1);
}

#[test]
fn test_run_rejects_unknown_mode() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["run", "--mode", "nap"]);
    assert_ne!(code, 0);
}
