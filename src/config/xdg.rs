//! XDG Base Directory support.

use std::path::PathBuf;

const APP_DIR: &str = "homefeed";

/// XDG directory paths for homefeed.
pub struct XdgDirs {
    /// Config directory (~/.config/homefeed or XDG_CONFIG_HOME/homefeed)
    pub config: PathBuf,
    /// Data directory (~/.local/share/homefeed or XDG_DATA_HOME/homefeed)
    pub data: PathBuf,
}

impl XdgDirs {
    /// Get XDG directories, respecting environment variables.
    pub fn new() -> Self {
        Self {
            config: base_dir("XDG_CONFIG_HOME", ".config").join(APP_DIR),
            data: base_dir("XDG_DATA_HOME", ".local/share").join(APP_DIR),
        }
    }

    /// Ensure all directories exist.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.data] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}

/// `$var` when set and non-empty, else `~/<fallback>`.
fn base_dir(var: &str, fallback: &str) -> PathBuf {
    match std::env::var_os(var) {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(fallback),
    }
}
