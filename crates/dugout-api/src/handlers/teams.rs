use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use dugout_db::membership;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::AppState;

/// Teams the caller is a member of
#[utoipa::path(
    get,
    path = "/teams",
    responses(
        (status = 200, description = "Memberships of the caller", body = Vec<TeamMembershipInfo>),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "teams"
)]
pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<TeamMembershipInfo>>, ApiError> {
    let teams = membership::teams_for(&state.db, auth.user_id).await?;

    Ok(Json(teams.into_iter().map(Into::into).collect()))
}
