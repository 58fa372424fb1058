//! Configuration management.

mod settings;
mod xdg;

pub use settings::{ConfigError, ServerConfig, ServerOverrides};
pub use xdg::XdgDirs;
