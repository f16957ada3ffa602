use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use tracing::{debug, info};

use dugout_db::entities::player;
use dugout_db::queries;

use crate::authz;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::validation;
use crate::AppState;

/// Roster of every team the caller belongs to
#[utoipa::path(
    get,
    path = "/players",
    responses(
        (status = 200, description = "Players, ordered by team then jersey number", body = Vec<Player>),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Player>>, ApiError> {
    let rows = queries::players_for_user(&state.db, auth.user_id).await?;
    debug!("Listing {} players for user {}", rows.len(), auth.user_id);

    Ok(Json(rows.into_iter().map(Player::from).collect()))
}

/// Add a player (team admin only)
#[utoipa::path(
    post,
    path = "/players",
    request_body = CreatePlayerRequest,
    responses(
        (status = 201, description = "Player added", body = Player),
        (status = 400, description = "Invalid input or jersey number already taken", body = ErrorResponse),
        (status = 403, description = "Caller does not administer the team", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "players"
)]
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreatePlayerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Player>), ApiError> {
    let Json(req) = payload?;

    // Checked before the body shape
    if let Some(team_id) = req.team_id {
        authz::require_team_admin(
            &state.db,
            &auth,
            team_id,
            "Not authorized to add players to this team",
        )
        .await?;
    }

    let new = validation::new_player(req)?;

    let row = player::ActiveModel {
        team_id: Set(new.team_id),
        name: Set(new.name),
        jersey_number: Set(new.jersey_number),
        position: Set(new.position),
        role: Set(new.role),
        email: Set(new.email),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| ApiError::from_write(e, "Jersey number already taken"))?;

    info!(
        "Added player {} (#{}) to team {}",
        row.id, row.jersey_number, row.team_id
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}
