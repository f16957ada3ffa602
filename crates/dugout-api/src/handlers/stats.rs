use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing::info;

use dugout_db::entities::player_stat;
use dugout_db::entities::prelude as db;
use dugout_db::queries;

use crate::authz::{self, OwnershipPolicy};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::validation;
use crate::AppState;

const NOT_AUTHORIZED: &str = "Only admins can add stats";

/// Stat lines for players on the caller's teams
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Stat lines, by game then player", body = Vec<PlayerStat>),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn list_stats(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<PlayerStat>>, ApiError> {
    let rows = queries::stats_for_user(&state.db, auth.user_id).await?;

    Ok(Json(rows.into_iter().map(PlayerStat::from).collect()))
}

/// Record a player's stats for one game
///
/// Under the default policy any global admin may record stats; with strict
/// ownership only the admin of the player's team may.
#[utoipa::path(
    post,
    path = "/stats",
    request_body = CreateStatRequest,
    responses(
        (status = 201, description = "Stats recorded", body = PlayerStat),
        (status = 400, description = "Invalid input or stats already recorded", body = ErrorResponse),
        (status = 403, description = "Caller may not record stats", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn create_stat(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<CreateStatRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlayerStat>), ApiError> {
    let Json(req) = payload?;

    if state.ownership == OwnershipPolicy::GlobalRole {
        authz::require_global_admin(&auth, NOT_AUTHORIZED)?;
    }

    let player = match req.player_id {
        Some(player_id) => db::Player::find_by_id(player_id).one(&state.db).await?,
        None => None,
    };

    if state.ownership == OwnershipPolicy::TeamAdmin && req.player_id.is_some() {
        match &player {
            Some(player) => {
                authz::require_team_admin(&state.db, &auth, player.team_id, NOT_AUTHORIZED)
                    .await?
            }
            // Same answer as a player on someone else's team
            None => return Err(ApiError::Forbidden(NOT_AUTHORIZED.to_string())),
        }
    }

    let new = validation::new_stat(req)?;
    let player = player.ok_or_else(|| ApiError::InvalidInput("Player not found".to_string()))?;
    let game = db::Game::find_by_id(new.game_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::InvalidInput("Game not found".to_string()))?;
    if game.team_id != player.team_id {
        return Err(ApiError::InvalidInput(
            "Game does not belong to the player's team".to_string(),
        ));
    }

    let row = player_stat::ActiveModel {
        player_id: Set(new.player_id),
        game_id: Set(new.game_id),
        at_bats: Set(new.at_bats),
        hits: Set(new.hits),
        rbis: Set(new.rbis),
        runs: Set(new.runs),
        strikeouts: Set(new.strikeouts),
        walks: Set(new.walks),
        innings_pitched: Set(new.innings_pitched),
        earned_runs: Set(new.earned_runs),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|e| ApiError::from_write(e, "Stats already exist for this player and game"))?;

    info!(
        "Recorded stats {} for player {} in game {}",
        row.id, row.player_id, row.game_id
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}
