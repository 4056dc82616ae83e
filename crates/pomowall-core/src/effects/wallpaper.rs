//! Desktop background through one OS call per platform.
//!
//! - Windows: `SystemParametersInfoW(SPI_SETDESKWALLPAPER / SPI_GETDESKWALLPAPER)`
//! - macOS: `osascript` talking to System Events
//! - Other unix desktops: GNOME's `gsettings` keys

use std::path::{Path, PathBuf};

use tracing::debug;

use super::WallpaperController;
use crate::error::EffectError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemWallpaper;

impl SystemWallpaper {
    pub fn new() -> Self {
        Self
    }
}

impl WallpaperController for SystemWallpaper {
    fn set_wallpaper(&self, path: &Path) -> Result<(), EffectError> {
        if !path.is_file() {
            return Err(EffectError::MissingFile(path.to_path_buf()));
        }
        debug!(path = %path.display(), "setting wallpaper");
        platform::set(path)
    }

    fn current_wallpaper(&self) -> Result<Option<PathBuf>, EffectError> {
        platform::get()
    }
}

#[cfg(windows)]
mod platform {
    use std::ffi::OsString;
    use std::os::windows::ffi::{OsStrExt, OsStringExt};
    use std::path::{Path, PathBuf};

    use windows::Win32::Foundation::MAX_PATH;
    use windows::Win32::UI::WindowsAndMessaging::{
        SystemParametersInfoW, SPIF_SENDWININICHANGE, SPIF_UPDATEINIFILE, SPI_GETDESKWALLPAPER,
        SPI_SETDESKWALLPAPER, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS,
    };

    use crate::error::EffectError;

    pub fn set(path: &Path) -> Result<(), EffectError> {
        let mut wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
        unsafe {
            SystemParametersInfoW(
                SPI_SETDESKWALLPAPER,
                0,
                Some(wide.as_mut_ptr().cast()),
                SPIF_UPDATEINIFILE | SPIF_SENDWININICHANGE,
            )
        }
        .map_err(|e| EffectError::Wallpaper(e.to_string()))
    }

    pub fn get() -> Result<Option<PathBuf>, EffectError> {
        let mut buf = [0u16; MAX_PATH as usize];
        unsafe {
            SystemParametersInfoW(
                SPI_GETDESKWALLPAPER,
                buf.len() as u32,
                Some(buf.as_mut_ptr().cast()),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        }
        .map_err(|e| EffectError::Wallpaper(e.to_string()))?;

        let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(OsString::from_wide(&buf[..len]))))
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use std::path::{Path, PathBuf};
    use std::process::Command;

    use crate::error::EffectError;

    fn osascript(script: &str) -> Result<String, EffectError> {
        let output = Command::new("osascript")
            .args(["-e", script])
            .output()
            .map_err(|e| EffectError::Wallpaper(format!("osascript: {e}")))?;
        if !output.status.success() {
            return Err(EffectError::Wallpaper(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn set(path: &Path) -> Result<(), EffectError> {
        let escaped = path.display().to_string().replace('\\', "\\\\").replace('"', "\\\"");
        osascript(&format!(
            "tell application \"System Events\" to tell every desktop to set picture to \"{escaped}\""
        ))
        .map(|_| ())
    }

    pub fn get() -> Result<Option<PathBuf>, EffectError> {
        let out = osascript("tell application \"System Events\" to get picture of current desktop")?;
        Ok((!out.is_empty()).then(|| PathBuf::from(out)))
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
mod platform {
    use std::path::{Path, PathBuf};
    use std::process::Command;

    use url::Url;

    use crate::error::EffectError;

    const SCHEMA: &str = "org.gnome.desktop.background";
    const KEYS: [&str; 2] = ["picture-uri", "picture-uri-dark"];

    fn gsettings(args: &[&str]) -> Result<String, EffectError> {
        let output = Command::new("gsettings")
            .args(args)
            .output()
            .map_err(|e| EffectError::Wallpaper(format!("gsettings: {e}")))?;
        if !output.status.success() {
            return Err(EffectError::Wallpaper(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    pub fn set(path: &Path) -> Result<(), EffectError> {
        let absolute = std::fs::canonicalize(path)
            .map_err(|e| EffectError::Wallpaper(format!("{}: {e}", path.display())))?;
        let uri = Url::from_file_path(&absolute)
            .map_err(|_| EffectError::Wallpaper(format!("not a file path: {}", absolute.display())))?;

        gsettings(&["set", SCHEMA, KEYS[0], uri.as_str()])?;
        // Older GNOME has no dark variant; the light key is what matters.
        let _ = gsettings(&["set", SCHEMA, KEYS[1], uri.as_str()]);
        Ok(())
    }

    pub fn get() -> Result<Option<PathBuf>, EffectError> {
        let out = gsettings(&["get", SCHEMA, KEYS[0]])?;
        Ok(parse_picture_uri(&out))
    }

    /// `'file:///home/me/a%20b.png'` -> `/home/me/a b.png`
    pub(super) fn parse_picture_uri(raw: &str) -> Option<PathBuf> {
        let trimmed = raw.trim().trim_matches('\'');
        if trimmed.is_empty() {
            return None;
        }
        match Url::parse(trimmed) {
            Ok(url) => url.to_file_path().ok(),
            Err(_) => Some(PathBuf::from(trimmed)),
        }
    }
}

#[cfg(not(any(unix, windows)))]
mod platform {
    use std::path::{Path, PathBuf};

    use crate::error::EffectError;

    pub fn set(_path: &Path) -> Result<(), EffectError> {
        Err(EffectError::Unsupported("wallpaper"))
    }

    pub fn get() -> Result<Option<PathBuf>, EffectError> {
        Err(EffectError::Unsupported("wallpaper"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_rejected_before_os_call() {
        let err = SystemWallpaper::new()
            .set_wallpaper(Path::new("/definitely/not/here.png"))
            .unwrap_err();
        assert!(matches!(err, EffectError::MissingFile(_)));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    #[test]
    fn parses_gsettings_output() {
        assert_eq!(
            platform::parse_picture_uri("'file:///home/me/My%20Pics/sea.png'\n"),
            Some(PathBuf::from("/home/me/My Pics/sea.png"))
        );
        assert_eq!(
            platform::parse_picture_uri("'/usr/share/backgrounds/default.png'"),
            Some(PathBuf::from("/usr/share/backgrounds/default.png"))
        );
        assert_eq!(platform::parse_picture_uri("''"), None);
    }
}
