//! Core error types for pomowall-core.
//!
//! Configuration problems are usually recovered where they happen; these
//! types exist for the paths that report back to a caller (saving state,
//! user-initiated wallpaper and sound actions).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomowall-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Side-effect errors (audio, wallpaper, notification)
    #[error("Side effect failed: {0}")]
    Effect(#[from] EffectError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the settings file
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Errors raised by the desktop collaborators.
#[derive(Error, Debug)]
pub enum EffectError {
    /// Manual apply without a chosen wallpaper
    #[error("No wallpaper selected")]
    NoWallpaperSelected,

    /// Restore requested but the original wallpaper was never captured
    #[error("Original wallpaper path is unknown")]
    NoOriginalWallpaper,

    /// File chosen by the user no longer exists
    #[error("File does not exist: {0}")]
    MissingFile(PathBuf),

    /// The OS refused to change or report the wallpaper
    #[error("Wallpaper call failed: {0}")]
    Wallpaper(String),

    /// No audio backend could play the cue
    #[error("Audio playback failed: {0}")]
    Audio(String),

    /// Desktop notification could not be shown
    #[error("Notification failed: {0}")]
    Notification(String),

    /// Operation has no implementation on this platform
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<notify_rust::error::Error> for EffectError {
    fn from(err: notify_rust::error::Error) -> Self {
        EffectError::Notification(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_core_error() {
        let err: CoreError = ConfigError::UnknownKey("ui.theme".into()).into();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Unknown configuration key: ui.theme"
        );
    }

    #[test]
    fn effect_error_messages_name_the_file() {
        let err = EffectError::MissingFile(PathBuf::from("/tmp/beach.png"));
        assert_eq!(err.to_string(), "File does not exist: /tmp/beach.png");
    }
}
