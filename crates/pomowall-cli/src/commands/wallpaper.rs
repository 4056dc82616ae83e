use std::path::PathBuf;

use clap::Subcommand;
use pomowall_core::storage::Settings;
use pomowall_core::EffectError;

use super::{open_preferences, system_effects, CmdResult};

#[derive(Subcommand)]
pub enum WallpaperAction {
    /// Choose the image shown during breaks
    Set {
        /// Image file
        path: PathBuf,
    },
    /// Show the break wallpaper now
    Apply,
    /// Put back the wallpaper from before the swap
    Restore,
    /// Print the chosen break wallpaper
    Show,
}

pub fn run(action: WallpaperAction) -> CmdResult {
    let prefs = open_preferences()?;

    match action {
        WallpaperAction::Set { path } => {
            if !path.is_file() {
                return Err(EffectError::MissingFile(path).into());
            }
            let path = std::fs::canonicalize(&path)?;
            prefs.set_wallpaper_path(Some(path.clone()))?;
            println!("break wallpaper: {}", path.display());
        }
        WallpaperAction::Show => match prefs.wallpaper_path() {
            Some(path) => println!("{}", path.display()),
            None => println!("no wallpaper selected"),
        },
        WallpaperAction::Apply => {
            let effects = system_effects(prefs, &Settings::load_or_default())?;
            match effects.apply_wallpaper() {
                Ok(path) => println!("applied {}", path.display()),
                Err(e) => eprintln!("warning: {e}"),
            }
        }
        WallpaperAction::Restore => {
            let effects = system_effects(prefs, &Settings::load_or_default())?;
            match effects.restore_wallpaper() {
                Ok(path) => println!("restored {}", path.display()),
                Err(e) => eprintln!("warning: {e}"),
            }
        }
    }
    Ok(())
}
