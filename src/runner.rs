//! Application Runner Module
//!
//! Logging setup plus the entry points behind each CLI command.

use anyhow::Context;
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ServerConfig;
use crate::db::{seed, Database, TemplateStore};
use crate::server::{self, AppState};

/// Shared application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Enable debug logging
    pub debug: bool,
    /// Enable verbose (trace-level) logging
    pub verbose: bool,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the flags when set.
pub fn init_tracing(config: &AppConfig) {
    let default_filter = if config.verbose {
        "trace"
    } else if config.debug {
        "debug"
    } else {
        "info,homefeed=debug,tower_http=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // try_init: a second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Run the HTTP server until Ctrl-C.
pub fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(serve(config))
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db_path = config.database_path();
    let db = Database::open_at(db_path.clone())
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    db.migrate().context("Failed to apply schema")?;

    let templates = match &config.templates {
        Some(dir) => TemplateStore::new(dir),
        None => TemplateStore::in_memory(),
    }
    .with_builtin_templates();

    tracing::info!(
        database = %db_path.display(),
        templates = ?templates.root(),
        "Starting homefeed"
    );

    let cors = server::create_cors_layer(config.frontend_origin.as_deref())?;
    let app = server::create_router(AppState::new(db, templates), cors);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to address {}", config.bind))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    server::serve(listener, app)
        .await
        .context("Server terminated with an error")
}

/// Create the schema in the database at `path`.
pub fn run_schema_load(path: &Path) -> anyhow::Result<()> {
    let db = Database::open_at(path.to_path_buf())
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    db.migrate()?;
    tracing::info!(database = %path.display(), "Schema loaded");
    Ok(())
}

/// Create the schema if needed and insert demo activities.
pub fn run_seed(path: &Path) -> anyhow::Result<usize> {
    let db = Database::open_at(path.to_path_buf())
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    db.migrate()?;
    seed::seed_demo_activities(&db).context("Failed to seed demo activities")
}
