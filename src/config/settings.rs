//! Server configuration file handling.
//!
//! The config file is JSON at `$XDG_CONFIG_HOME/homefeed/config.json`. Every
//! field is optional; command-line flags and environment variables (see
//! [`ServerOverrides`]) win over the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::XdgDirs;
use crate::db::Database;

/// Error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Runtime configuration for the feed server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,

    /// SQLite database file. Defaults to the XDG data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Directory holding `<namespace>/<name>.sql` templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates: Option<PathBuf>,

    /// Browser origin allowed by CORS. Any origin when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 4567)),
            database: None,
            templates: Some(PathBuf::from("db/sql")),
            frontend_origin: None,
        }
    }
}

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ServerOverrides {
    pub bind: Option<SocketAddr>,
    pub database: Option<PathBuf>,
    pub templates: Option<PathBuf>,
    pub frontend_origin: Option<String>,
}

impl ServerConfig {
    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load an explicitly requested file, or the default file when present.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_path(path),
            None => match Self::load_from_path(&Self::default_config_path()) {
                Err(ConfigError::NotFound(_)) => Ok(Self::default()),
                other => other,
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Write the default configuration to `explicit`, or to the default
    /// path when none is given. Returns the path written.
    pub fn init_at(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                XdgDirs::new().ensure_dirs()?;
                Self::default_config_path()
            }
        };
        Self::default().save_to_path(&path)?;
        Ok(path)
    }

    /// Get the default configuration path.
    pub fn default_config_path() -> PathBuf {
        XdgDirs::new().config.join("config.json")
    }

    /// Apply command-line/environment values on top of this config.
    pub fn with_overrides(mut self, overrides: ServerOverrides) -> Self {
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if overrides.database.is_some() {
            self.database = overrides.database;
        }
        if overrides.templates.is_some() {
            self.templates = overrides.templates;
        }
        if overrides.frontend_origin.is_some() {
            self.frontend_origin = overrides.frontend_origin;
        }
        self
    }

    /// The database file to open.
    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(Database::default_path)
    }
}
