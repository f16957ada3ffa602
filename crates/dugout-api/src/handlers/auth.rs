use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Extension, Json};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use tracing::{debug, info};

use dugout_auth::password::{hash_password, verify_against_dummy, verify_password};
use dugout_db::entities::prelude as db;
use dugout_db::entities::{team_membership, user};
use dugout_db::membership;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::validation;
use crate::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Register with a team invite code
///
/// Creates the user and their membership in the invite code's team in one
/// transaction, then returns a session token.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Invalid input, unknown invite code or existing email", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = payload?;
    let reg = validation::registration(req)?;
    debug!("Registering {}", reg.email);

    let txn = state.db.begin().await?;

    // Email first: a used address conflicts whatever code accompanies it
    let existing = db::User::find()
        .filter(user::Column::Email.eq(reg.email.as_str()))
        .one(&txn)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let team = membership::find_team_by_invite_code(&txn, &reg.code)
        .await?
        .ok_or_else(|| ApiError::InvalidInput("Invalid registration code".to_string()))?;

    let password = reg.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let now = Utc::now();
    let user = user::ActiveModel {
        name: Set(reg.name),
        email: Set(reg.email),
        password_hash: Set(password_hash),
        role: Set(reg.role),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| ApiError::from_write(e, "User already exists"))?;

    team_membership::ActiveModel {
        user_id: Set(user.id),
        team_id: Set(team.id),
        role: Set(reg.role),
        joined_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let token = state.tokens.issue(user.id, user.role.as_str())?;
    info!("Registered user {} into team {}", user.id, team.id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = payload?;
    let (email, password) = validation::login(req)?;

    let found = db::User::find()
        .filter(user::Column::Email.eq(email.as_str()))
        .one(&state.db)
        .await?;

    let Some(user) = found else {
        tokio::task::spawn_blocking(move || verify_against_dummy(&password)).await?;
        debug!("Login for unknown email");
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    };

    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
    if !valid {
        debug!("Wrong password for user {}", user.id);
        return Err(ApiError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(user.id, user.role.as_str())?;
    info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

/// Current user and the teams they belong to
#[utoipa::path(
    get,
    path = "/auth/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = db::User::find_by_id(auth.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::Unauthenticated("User no longer exists".to_string()))?;

    let teams = membership::teams_for(&state.db, user.id).await?;

    Ok(Json(ProfileResponse {
        user: user.into(),
        teams: teams.into_iter().map(Into::into).collect(),
    }))
}
