// marksync platform abstraction
// Provides platform-specific config and data paths for Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory on every platform.
pub const DATA_DIR_ENV: &str = "MARKSYNC_DATA_DIR";

/// Returns the platform-specific configuration directory for marksync.
///
/// - **Linux**: `~/.config/marksync` (or `$XDG_CONFIG_HOME/marksync`)
/// - **macOS**: `~/Library/Application Support/marksync`
/// - **Windows**: `%APPDATA%/marksync`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_config_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_config_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_config_dir()
    }
}

/// Returns the data directory for marksync.
///
/// `$MARKSYNC_DATA_DIR` wins when set; otherwise:
/// - **Linux**: `~/.local/share/marksync` (or `$XDG_DATA_HOME/marksync`)
/// - **macOS**: `~/Library/Application Support/marksync`
/// - **Windows**: `%APPDATA%/marksync`
pub fn get_data_dir() -> PathBuf {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
