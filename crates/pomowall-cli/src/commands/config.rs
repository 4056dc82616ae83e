use clap::Subcommand;
use pomowall_core::storage::Settings;
use pomowall_core::ConfigError;

use super::CmdResult;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one setting
    Get {
        /// Dotted key, e.g. `schedule.focus_duration` or `sound.enabled`
        key: String,
    },
    /// Change one setting
    Set {
        /// Dotted key
        key: String,
        /// Value; numbers for durations, true/false for toggles
        value: String,
    },
    /// Print every setting as `key = value`
    List,
    /// Overwrite config.toml with the defaults
    Reset,
}

pub fn run(action: ConfigAction) -> CmdResult {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load_or_default();
            match settings.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(ConfigError::UnknownKey(key).into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load()?;
            settings.set(&key, &value)?;
            settings.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let settings = Settings::load_or_default();
            for key in settings.keys() {
                if let Some(value) = settings.get(&key) {
                    println!("{key} = {value}");
                }
            }
        }
        ConfigAction::Reset => {
            Settings::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
