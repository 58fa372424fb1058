use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::services::HomeActivitiesError;

/// An error rendered as `{"error": code, "message": text}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl From<HomeActivitiesError> for ApiError {
    fn from(err: HomeActivitiesError) -> Self {
        let code = match &err {
            HomeActivitiesError::TemplateNotFound(_) => "template_not_found",
            HomeActivitiesError::QueryExecution(_) => "query_execution_failed",
        };

        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(code = self.code, status = %self.status, "{}", self.message);

        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));
        (self.status, body).into_response()
    }
}
