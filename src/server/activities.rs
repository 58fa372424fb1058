use axum::extract::State;
use axum::Json;

use super::{ApiError, AppState, IdentityToken};
use crate::db::Record;
use crate::services::fetch_home_activities;

/// GET /api/activities/home
///
/// The user's home feed, newest first as ordered by the template.
pub async fn home(
    State(state): State<AppState>,
    identity: IdentityToken,
) -> Result<Json<Vec<Record>>, ApiError> {
    let activities =
        fetch_home_activities(state.templates.as_ref(), &state.db, identity.as_deref()).await?;
    Ok(Json(activities))
}
