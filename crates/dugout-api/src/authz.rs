//! Ownership checks for mutations
//!
//! Reads are scoped by membership inside the queries; writes additionally need
//! the caller to manage the team.

use sea_orm::ConnectionTrait;
use tracing::warn;

use dugout_db::membership;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Who may record stats and upload media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OwnershipPolicy {
    /// Any user whose global role is `admin`
    #[default]
    GlobalRole,
    /// Only the team's `admin_id`, the same rule as roster and schedule
    TeamAdmin,
}

impl OwnershipPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            OwnershipPolicy::TeamAdmin
        } else {
            OwnershipPolicy::GlobalRole
        }
    }
}

/// Caller must be `teams.admin_id` for `team_id`.
pub async fn require_team_admin<C: ConnectionTrait>(
    db: &C,
    user: &AuthUser,
    team_id: i32,
    message: &str,
) -> Result<(), ApiError> {
    if membership::is_team_admin(db, user.user_id, team_id).await? {
        return Ok(());
    }

    warn!(
        "User {} is not the admin of team {}",
        user.user_id, team_id
    );
    Err(ApiError::Forbidden(message.to_string()))
}

/// Caller's global role must be `admin`.
pub fn require_global_admin(user: &AuthUser, message: &str) -> Result<(), ApiError> {
    if user.is_admin() {
        return Ok(());
    }

    warn!("User {} ({}) is not an admin", user.user_id, user.role);
    Err(ApiError::Forbidden(message.to_string()))
}

/// Dispatch on the configured policy.
pub async fn require_manager<C: ConnectionTrait>(
    policy: OwnershipPolicy,
    db: &C,
    user: &AuthUser,
    team_id: i32,
    message: &str,
) -> Result<(), ApiError> {
    match policy {
        OwnershipPolicy::GlobalRole => require_global_admin(user, message),
        OwnershipPolicy::TeamAdmin => require_team_admin(db, user, team_id, message).await,
    }
}
