use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use super::AppState;
use crate::db::QueryExecutor;

/// GET /api/health-check
pub async fn get(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state
        .db
        .query_object_json("SELECT sqlite_version() AS sqlite_version", &[])
        .await
    {
        Ok(row) => {
            let version = row
                .and_then(|mut row| row.remove("sqlite_version"))
                .unwrap_or(Value::Null);
            (
                StatusCode::OK,
                Json(json!({ "success": true, "ver": 1, "sqlite": version })),
            )
        }
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "success": false, "ver": 1, "error": e.to_string() })),
            )
        }
    }
}
