//! Named SQL templates.
//!
//! A template is plain SQL text addressed by `(namespace, name)`. On disk it
//! lives at `<root>/<namespace>/<name>.sql`; files are re-read on every lookup
//! so edits apply without a restart. Templates registered in memory (the
//! compiled-in defaults, for instance) answer when no file exists.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

const HOME_ACTIVITIES_SQL: &str = include_str!("../../db/sql/activities/home.sql");

/// Error type for template lookups.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {namespace}/{name}")]
    NotFound { namespace: String, name: String },

    #[error("Invalid template name: {0:?}")]
    InvalidName(String),

    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Resolves a logical template name to SQL text.
pub trait TemplateResolver: Send + Sync {
    fn template(&self, namespace: &str, name: &str) -> Result<String, TemplateError>;
}

/// File-backed template store with in-memory fallbacks.
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    root: Option<PathBuf>,
    registered: HashMap<(String, String), String>,
}

impl TemplateStore {
    /// Store reading templates from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            registered: HashMap::new(),
        }
    }

    /// Store with no template directory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Register the templates compiled into the binary.
    pub fn with_builtin_templates(self) -> Self {
        self.with_template("activities", "home", HOME_ACTIVITIES_SQL)
    }

    /// Register a template in memory.
    pub fn with_template(
        mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        sql: impl Into<String>,
    ) -> Self {
        self.registered
            .insert((namespace.into(), name.into()), sql.into());
        self
    }

    /// The template directory, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Where a template would live on disk.
    pub fn template_path(&self, namespace: &str, name: &str) -> Option<PathBuf> {
        self.root
            .as_ref()
            .map(|root| root.join(namespace).join(format!("{name}.sql")))
    }
}

impl TemplateResolver for TemplateStore {
    fn template(&self, namespace: &str, name: &str) -> Result<String, TemplateError> {
        validate_segment(namespace)?;
        validate_segment(name)?;

        if let Some(path) = self.template_path(namespace, name) {
            match fs::read_to_string(&path) {
                Ok(sql) => {
                    tracing::debug!(
                        template = %format!("{namespace}/{name}"),
                        path = %path.display(),
                        %sql,
                        "Loaded SQL template"
                    );
                    return Ok(sql);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(TemplateError::Read { path, source }),
            }
        }

        let key = (namespace.to_string(), name.to_string());
        match self.registered.get(&key) {
            Some(sql) => {
                tracing::debug!(
                    template = %format!("{namespace}/{name}"),
                    %sql,
                    "Using built-in SQL template"
                );
                Ok(sql.clone())
            }
            None => Err(TemplateError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            }),
        }
    }
}

/// Names become path segments, so only a plain identifier is allowed.
fn validate_segment(segment: &str) -> Result<(), TemplateError> {
    let valid = !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(TemplateError::InvalidName(segment.to_string()))
    }
}
