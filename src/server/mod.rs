//! HTTP surface for the home feed.

mod activities;
mod error;
mod health;
mod identity;

use axum::http::{header, HeaderValue, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::{Database, TemplateStore};

pub use error::ApiError;
pub use identity::IdentityToken;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub templates: Arc<TemplateStore>,
}

impl AppState {
    pub fn new(db: Database, templates: TemplateStore) -> Self {
        Self {
            db,
            templates: Arc::new(templates),
        }
    }
}

/// Build the application router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/api/activities/home", get(activities::home))
        .route("/api/health-check", get(health::get))
        .with_state(state)
        .fallback(handler_404)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser frontend.
///
/// With an origin configured only that origin is allowed; otherwise any.
pub fn create_cors_layer(frontend_origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(match frontend_origin {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|e| anyhow::anyhow!("Invalid frontend origin {origin:?}: {e}"))?;
            layer.allow_origin(origin)
        }
        None => layer.allow_origin(Any),
    })
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

async fn handler_404(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("No route for {}", uri.path()),
        })),
    )
}
