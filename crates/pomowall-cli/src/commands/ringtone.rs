use std::path::PathBuf;

use clap::Subcommand;
use pomowall_core::storage::Settings;
use pomowall_core::EffectError;

use super::{open_preferences, system_effects, CmdResult};

#[derive(Subcommand)]
pub enum RingtoneAction {
    /// Play this file instead of the built-in beeps
    Set {
        /// Audio file
        path: PathBuf,
    },
    /// Go back to the built-in beeps
    Clear,
    /// Play the finish cue once
    Test,
}

pub fn run(action: RingtoneAction) -> CmdResult {
    let prefs = open_preferences()?;

    match action {
        RingtoneAction::Set { path } => {
            if !path.is_file() {
                return Err(EffectError::MissingFile(path).into());
            }
            let path = std::fs::canonicalize(&path)?;
            prefs.set_ringtone_path(Some(path.clone()))?;
            println!("ringtone: {}", path.display());
        }
        RingtoneAction::Clear => {
            prefs.set_ringtone_path(None)?;
            let settings = Settings::load_or_default();
            if !settings.sound.enabled {
                println!("ringtone cleared, using built-in beeps (sound is off)");
                return Ok(());
            }
            println!("ringtone cleared, playing the built-in beeps");
            let effects = system_effects(prefs, &settings)?;
            if let Err(e) = effects.test_ringtone() {
                eprintln!("warning: {e}");
            }
        }
        RingtoneAction::Test => {
            let effects = system_effects(prefs, &Settings::load_or_default())?;
            if let Err(e) = effects.test_ringtone() {
                eprintln!("warning: {e}");
            }
        }
    }
    Ok(())
}
