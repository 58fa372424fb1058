//! Homefeed Library
//!
//! Serves a user's home activity feed: named SQL templates executed against
//! SQLite, returned as JSON over HTTP.

pub mod config;
pub mod db;
pub mod runner;
pub mod server;
pub mod services;
