mod config;
mod preferences;
mod state;

pub use config::{NotificationsConfig, ScheduleConfig, Settings, SoundConfig, SETTINGS_FILE_NAME};
pub use preferences::SharedPreferences;
pub use state::{ConfigStore, PersistedState, Preferences, STATE_FILE_NAME};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/pomowall[-dev]/` based on POMOWALL_ENV.
///
/// Set POMOWALL_ENV=dev to use development data directory, or POMOWALL_HOME
/// to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("POMOWALL_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("POMOWALL_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomowall-dev")
            } else {
                base_dir.join("pomowall")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
