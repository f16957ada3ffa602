use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tracing::{debug, info, warn};

use dugout_db::entities::media;
use dugout_db::entities::prelude as db;
use dugout_db::queries;

use crate::authz::{self, OwnershipPolicy};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::*;
use crate::upload;
use crate::AppState;

const NOT_AUTHORIZED: &str = "Only admins can upload media";

/// Photos and videos of the caller's teams
#[utoipa::path(
    get,
    path = "/media",
    responses(
        (status = 200, description = "Media, newest first", body = Vec<Media>),
        (status = 401, description = "Missing or malformed token", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "media"
)]
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<Media>>, ApiError> {
    let rows = queries::media_for_user(&state.db, auth.user_id).await?;

    Ok(Json(rows.into_iter().map(Media::from).collect()))
}

struct UploadedFile {
    ext: String,
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct UploadForm {
    file: Option<UploadedFile>,
    team_id: Option<String>,
    game_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

/// Read the form into memory. The file part is type-checked from its headers
/// before its body is read, and its size is checked while reading.
async fn read_form(mut multipart: Multipart, max_bytes: usize) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                let ext = upload::check_media_type(field.file_name(), field.content_type())
                    .ok_or_else(|| {
                        ApiError::InvalidInput("Only images and videos are allowed".to_string())
                    })?;
                let content_type = field.content_type().unwrap_or_default().to_string();

                let mut bytes = Vec::new();
                while let Some(chunk) = field.chunk().await? {
                    if bytes.len() + chunk.len() > max_bytes {
                        return Err(ApiError::InvalidInput(format!(
                            "File too large (limit is {} bytes)",
                            max_bytes
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                form.file = Some(UploadedFile {
                    ext,
                    content_type,
                    bytes,
                });
            }
            "teamId" => form.team_id = Some(field.text().await?),
            "gameId" => form.game_id = Some(field.text().await?),
            "title" => form.title = Some(field.text().await?),
            "description" => form.description = Some(field.text().await?),
            other => debug!("Ignoring upload field '{}'", other),
        }
    }

    Ok(form)
}

fn parse_id(field: &str, value: &str) -> Result<i32, ApiError> {
    value.trim().parse().map_err(|_| {
        ApiError::Validation(vec![FieldError::new(field, "Must be a numeric id")])
    })
}

/// Upload a photo or video
///
/// Multipart form with a `file` part plus `teamId`, `title` and optional
/// `gameId` and `description`. Accepts jpeg, jpg, png, gif, mp4, mov and avi
/// up to 100 MiB.
#[utoipa::path(
    post,
    path = "/media/upload",
    request_body(content = MediaUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Media stored", body = Media),
        (status = 400, description = "Missing file, disallowed type, too large or invalid fields", body = ErrorResponse),
        (status = 403, description = "Caller may not upload media", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "media"
)]
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Media>), ApiError> {
    // The global role is known before the body is touched
    if state.ownership == OwnershipPolicy::GlobalRole {
        authz::require_global_admin(&auth, NOT_AUTHORIZED)?;
    }

    let form = read_form(multipart, state.max_upload_bytes).await?;

    let file = form
        .file
        .ok_or_else(|| ApiError::InvalidInput("No file uploaded".to_string()))?;

    let team_id = parse_id("teamId", form.team_id.as_deref().unwrap_or_default())?;
    let game_id = match form.game_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_id("gameId", raw)?),
    };
    let title = form.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::Validation(vec![FieldError::new(
            "title",
            "Title is required",
        )]));
    }
    let description = form
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    authz::require_manager(state.ownership, &state.db, &auth, team_id, NOT_AUTHORIZED).await?;

    if let Some(game_id) = game_id {
        let game = db::Game::find_by_id(game_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| ApiError::InvalidInput("Game not found".to_string()))?;
        if game.team_id != team_id {
            return Err(ApiError::InvalidInput(
                "Game does not belong to this team".to_string(),
            ));
        }
    }

    let file_name = upload::stored_file_name(&file.ext);
    upload::save(&state.upload_dir, &file_name, &file.bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

    let inserted = media::ActiveModel {
        team_id: Set(team_id),
        game_id: Set(game_id),
        title: Set(title.to_string()),
        description: Set(description),
        file_type: Set(upload::media_kind(&file.content_type)),
        file_url: Set(upload::public_url(&file_name)),
        file_size: Set(file.bytes.len() as i64),
        uploaded_by: Set(auth.user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            if let Err(io) = tokio::fs::remove_file(state.upload_dir.join(&file_name)).await {
                warn!("Could not remove orphaned upload {}: {}", file_name, io);
            }
            return Err(ApiError::from_write(e, "Media already exists"));
        }
    };

    info!(
        "User {} uploaded {} ({} bytes) to team {}",
        auth.user_id, row.file_url, row.file_size, row.team_id
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}
