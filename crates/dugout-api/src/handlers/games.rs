use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use tracing::info;

use dugout_db::entities::game;
use dugout_db::queries;

use crate::authz;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::validation;
use crate::AppState;

/// Schedule of every team the caller belongs to
#[utoipa::path(
    get,
    path = "/games",
    responses(
        (status = 200, description = "Games, most recent date and time first", body = Vec<Game>),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "games"
)]
pub async fn list_games(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Game>>, ApiError> {
    let rows = queries::games_for_user(&state.db, auth.user_id).await?;

    Ok(Json(rows.into_iter().map(Game::from).collect()))
}

/// Schedule a game (team admin only)
#[utoipa::path(
    post,
    path = "/games",
    request_body = CreateGameRequest,
    responses(
        (status = 201, description = "Game scheduled", body = Game),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Caller does not administer the team", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "games"
)]
pub async fn create_game(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreateGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Game>), ApiError> {
    let Json(req) = payload?;

    // Checked before the body shape
    if let Some(team_id) = req.team_id {
        authz::require_team_admin(
            &state.db,
            &auth,
            team_id,
            "Not authorized to add games to this team",
        )
        .await?;
    }

    let new = validation::new_game(req)?;

    let row = game::ActiveModel {
        team_id: Set(new.team_id),
        opponent: Set(new.opponent),
        game_date: Set(new.game_date),
        game_time: Set(new.game_time),
        location: Set(new.location),
        home_away: Set(new.home_away),
        status: Set(new.status),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| ApiError::from_write(e, "Game already exists"))?;

    info!(
        "Scheduled game {} vs {} on {} for team {}",
        row.id, row.opponent, row.game_date, row.team_id
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}
