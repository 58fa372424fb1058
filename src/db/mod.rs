//! SQLite database for the home feed.
//!
//! Owns the connection, applies the schema, and implements the two seams the
//! feed service depends on: [`TemplateResolver`] (named SQL text) and
//! [`QueryExecutor`] (rows as JSON records).

mod query;
mod schema;
pub mod seed;
mod templates;

use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::XdgDirs;

pub use query::{QueryError, QueryExecutor, Record};
pub use schema::*;
pub use templates::{TemplateError, TemplateResolver, TemplateStore};

/// Database connection wrapper.
///
/// Cheap to clone; clones share one connection.
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl Database {
    /// Open the database at a specific path.
    pub fn open_at(path: PathBuf) -> anyhow::Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        Self::from_connection(conn, Some(path))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Get the default database path.
    pub fn default_path() -> PathBuf {
        XdgDirs::new().data.join("homefeed.db")
    }

    /// Create tables and indexes. Safe to run repeatedly.
    pub fn migrate(&self) -> anyhow::Result<()> {
        schema::apply_schema(&self.conn())?;
        tracing::debug!(path = ?self.path, "schema applied");
        Ok(())
    }

    /// Lock and borrow the connection.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    /// Get the database path, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn shared(&self) -> Arc<Mutex<Connection>> {
        Arc::clone(&self.conn)
    }
}
