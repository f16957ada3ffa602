use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use dugout_db::entities::game::{GameStatus, HomeAway};
use dugout_db::entities::media::MediaKind;
use dugout_db::entities::user::Role;
use dugout_db::entities::{game, media, player, player_stat, user};
use dugout_db::membership::TeamAccess;

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Per-field validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name (at least 2 characters)
    pub name: Option<String>,
    /// Email address (must not be registered yet)
    pub email: Option<String>,
    /// Password (at least 6 characters)
    pub password: Option<String>,
    /// Team invite code
    pub code: Option<String>,
    /// `player` or `parent`
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "player")]
    pub role: Role,
}

impl From<user::Model> for UserInfo {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Successful register or login
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserInfo,
    /// Bearer token, valid for 7 days
    pub token: String,
}

/// A team the caller belongs to
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamMembershipInfo {
    pub team_id: i32,
    pub team_name: String,
    pub season: String,
    /// Role on this team's membership
    #[schema(value_type = String, example = "parent")]
    pub role: Role,
    /// Whether the caller administers this team
    pub is_admin: bool,
}

impl From<TeamAccess> for TeamMembershipInfo {
    fn from(access: TeamAccess) -> Self {
        Self {
            team_id: access.team_id,
            team_name: access.team_name,
            season: access.season,
            role: access.role,
            is_admin: access.is_admin,
        }
    }
}

/// Current user with their teams
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserInfo,
    pub teams: Vec<TeamMembershipInfo>,
}

// ============================================================================
// Roster
// ============================================================================

/// Add a player to a team roster
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    pub team_id: Option<i32>,
    pub name: Option<String>,
    /// Unique within the team
    pub jersey_number: Option<i32>,
    pub position: Option<String>,
    /// Free-form depth chart role (e.g. "Starter")
    pub role: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Player {
    pub id: i32,
    pub team_id: i32,
    pub name: String,
    pub jersey_number: i32,
    pub position: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<player::Model> for Player {
    fn from(row: player::Model) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            name: row.name,
            jersey_number: row.jersey_number,
            position: row.position,
            role: row.role,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Schedule
// ============================================================================

/// Schedule a game
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub team_id: Option<i32>,
    pub opponent: Option<String>,
    /// `YYYY-MM-DD`
    #[schema(example = "2025-07-10")]
    pub game_date: Option<String>,
    /// `HH:MM` or `HH:MM:SS`
    #[schema(example = "15:00")]
    pub game_time: Option<String>,
    pub location: Option<String>,
    /// `home` or `away`
    pub home_away: Option<String>,
    /// `upcoming` (default), `completed` or `cancelled`
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Game {
    pub id: i32,
    pub team_id: i32,
    pub opponent: String,
    pub game_date: NaiveDate,
    #[schema(value_type = String, example = "15:00:00")]
    pub game_time: NaiveTime,
    pub location: Option<String>,
    #[schema(value_type = String, example = "home")]
    pub home_away: HomeAway,
    #[schema(value_type = String, example = "upcoming")]
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl From<game::Model> for Game {
    fn from(row: game::Model) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            opponent: row.opponent,
            game_date: row.game_date,
            game_time: row.game_time,
            location: row.location,
            home_away: row.home_away,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Record one player's line for one game. Omitted counters are 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStatRequest {
    pub player_id: Option<i32>,
    pub game_id: Option<i32>,
    pub at_bats: Option<i32>,
    pub hits: Option<i32>,
    pub rbis: Option<i32>,
    pub runs: Option<i32>,
    pub strikeouts: Option<i32>,
    pub walks: Option<i32>,
    pub innings_pitched: Option<f64>,
    pub earned_runs: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlayerStat {
    pub id: i32,
    pub player_id: i32,
    pub game_id: i32,
    pub at_bats: i32,
    pub hits: i32,
    pub rbis: i32,
    pub runs: i32,
    pub strikeouts: i32,
    pub walks: i32,
    pub innings_pitched: f64,
    pub earned_runs: i32,
    pub created_at: DateTime<Utc>,
}

impl From<player_stat::Model> for PlayerStat {
    fn from(row: player_stat::Model) -> Self {
        Self {
            id: row.id,
            player_id: row.player_id,
            game_id: row.game_id,
            at_bats: row.at_bats,
            hits: row.hits,
            rbis: row.rbis,
            runs: row.runs,
            strikeouts: row.strikeouts,
            walks: row.walks,
            innings_pitched: row.innings_pitched,
            earned_runs: row.earned_runs,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Media
// ============================================================================

/// Multipart form accepted by `POST /media/upload` (documentation only)
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaUploadForm {
    /// Image or video (jpeg, jpg, png, gif, mp4, mov, avi), at most 100 MiB
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    pub team_id: i32,
    pub game_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Media {
    pub id: i32,
    pub team_id: i32,
    pub game_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "image")]
    pub file_type: MediaKind,
    /// Public path, e.g. `/uploads/file-1720000000000-3f2a.jpg`
    pub file_url: String,
    pub file_size: i64,
    pub uploaded_by: i32,
    pub created_at: DateTime<Utc>,
}

impl From<media::Model> for Media {
    fn from(row: media::Model) -> Self {
        Self {
            id: row.id,
            team_id: row.team_id,
            game_id: row.game_id,
            title: row.title,
            description: row.description,
            file_type: row.file_type,
            file_url: row.file_url,
            file_size: row.file_size,
            uploaded_by: row.uploaded_by,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// System
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the database answers, `degraded` otherwise
    pub status: String,
    pub version: String,
}
