// marksync platform paths for Linux
// Config: ~/.config/marksync
// Data:   ~/.local/share/marksync

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "marksync";

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Resolves an XDG base directory, falling back to `$HOME/<default_rel>`.
fn xdg_dir(xdg: Option<String>, default_rel: &[&str]) -> PathBuf {
    match xdg.filter(|v| !v.is_empty()) {
        Some(base) => PathBuf::from(base).join(APP_DIR),
        None => {
            let mut path = home_dir();
            for part in default_rel {
                path = path.join(part);
            }
            path.join(APP_DIR)
        }
    }
}

/// Uses `$XDG_CONFIG_HOME/marksync` if set, otherwise `~/.config/marksync`.
pub fn get_config_dir() -> PathBuf {
    xdg_dir(env::var("XDG_CONFIG_HOME").ok(), &[".config"])
}

/// Uses `$XDG_DATA_HOME/marksync` if set, otherwise `~/.local/share/marksync`.
pub fn get_data_dir() -> PathBuf {
    xdg_dir(env::var("XDG_DATA_HOME").ok(), &[".local", "share"])
}
