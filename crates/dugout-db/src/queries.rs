//! Membership-scoped list reads
//!
//! Each query joins the resource through `teams` to `team_memberships` and
//! filters on the caller's user id inside the join. Rows of teams the caller
//! does not belong to are never loaded.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};

use crate::entities::prelude::*;
use crate::entities::{game, media, player, player_stat, team, team_membership};

pub async fn players_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<player::Model>, DbErr> {
    Player::find()
        .join(JoinType::InnerJoin, player::Relation::Team.def())
        .join(JoinType::InnerJoin, team::Relation::Memberships.def())
        .filter(team_membership::Column::UserId.eq(user_id))
        .order_by_asc(player::Column::TeamId)
        .order_by_asc(player::Column::JerseyNumber)
        .all(db)
        .await
}

/// Most recent first: by date, then time.
pub async fn games_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<game::Model>, DbErr> {
    Game::find()
        .join(JoinType::InnerJoin, game::Relation::Team.def())
        .join(JoinType::InnerJoin, team::Relation::Memberships.def())
        .filter(team_membership::Column::UserId.eq(user_id))
        .order_by_desc(game::Column::GameDate)
        .order_by_desc(game::Column::GameTime)
        .order_by_desc(game::Column::Id)
        .all(db)
        .await
}

/// Stats are owned through the player's team.
pub async fn stats_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<player_stat::Model>, DbErr> {
    PlayerStat::find()
        .join(JoinType::InnerJoin, player_stat::Relation::Player.def())
        .join(JoinType::InnerJoin, player::Relation::Team.def())
        .join(JoinType::InnerJoin, team::Relation::Memberships.def())
        .filter(team_membership::Column::UserId.eq(user_id))
        .order_by_asc(player_stat::Column::GameId)
        .order_by_asc(player_stat::Column::PlayerId)
        .all(db)
        .await
}

/// Newest uploads first.
pub async fn media_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Vec<media::Model>, DbErr> {
    Media::find()
        .join(JoinType::InnerJoin, media::Relation::Team.def())
        .join(JoinType::InnerJoin, team::Relation::Memberships.def())
        .filter(team_membership::Column::UserId.eq(user_id))
        .order_by_desc(media::Column::CreatedAt)
        .order_by_desc(media::Column::Id)
        .all(db)
        .await
}
