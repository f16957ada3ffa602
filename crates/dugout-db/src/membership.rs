//! Membership resolution
//!
//! Read access and write access are separate questions:
//! - a user may read a team's data when a `team_memberships` row exists;
//! - a user may write a team's roster and schedule when `teams.admin_id` is
//!   the user. The admin's own membership role is not consulted.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;

use crate::entities::prelude::*;
use crate::entities::{team, team_membership, user::Role};

/// One team a user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamAccess {
    pub team_id: i32,
    pub team_name: String,
    pub season: String,
    /// Role recorded on the membership row
    pub role: Role,
    /// Whether the user is this team's `admin_id`
    pub is_admin: bool,
}

/// All teams the user is a member of, ordered by team id.
pub async fn teams_for<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Vec<TeamAccess>, DbErr> {
    let rows = TeamMembership::find()
        .filter(team_membership::Column::UserId.eq(user_id))
        .order_by_asc(team_membership::Column::TeamId)
        .find_also_related(Team)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(membership, team)| {
            team.map(|team| TeamAccess {
                team_id: team.id,
                is_admin: team.admin_id == user_id,
                team_name: team.name,
                season: team.season,
                role: membership.role,
            })
        })
        .collect())
}

/// True iff `teams.admin_id == user_id` for the given team.
pub async fn is_team_admin<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    team_id: i32,
) -> Result<bool, DbErr> {
    let owned = Team::find()
        .filter(team::Column::Id.eq(team_id))
        .filter(team::Column::AdminId.eq(user_id))
        .count(db)
        .await?;

    Ok(owned > 0)
}

pub async fn find_team_by_invite_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> Result<Option<team::Model>, DbErr> {
    Team::find()
        .filter(team::Column::InviteCode.eq(code))
        .one(db)
        .await
}
