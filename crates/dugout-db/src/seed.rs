//! Demo data for local runs
//!
//! Creates the coach/player/parent accounts (password `password`), the
//! "Eagles Baseball" team joinable with invite code `TEAM123`, a short roster
//! and two games. Every row is looked up by its natural key first, so running
//! the seed again changes nothing.

use chrono::{NaiveDate, NaiveTime, Utc};
use dugout_auth::{hash_password, PasswordError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use thiserror::Error;
use tracing::info;

use crate::entities::game::{GameStatus, HomeAway};
use crate::entities::prelude::*;
use crate::entities::user::Role;
use crate::entities::{game, player, team, team_membership, user};

pub const DEMO_INVITE_CODE: &str = "TEAM123";
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("invalid demo fixture: {0}")]
    Fixture(String),
}

/// Counts of rows the seed actually inserted
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub teams: usize,
    pub memberships: usize,
    pub players: usize,
    pub games: usize,
}

const DEMO_USERS: [(&str, &str, Role); 3] = [
    ("Coach Johnson", "coach@team.com", Role::Admin),
    ("Mike Johnson", "player@team.com", Role::Player),
    ("Parent Smith", "parent@team.com", Role::Parent),
];

const DEMO_PLAYERS: [(&str, i32, &str, &str, &str); 3] = [
    ("Mike Johnson", 12, "Pitcher", "Starter", "mike.johnson@email.com"),
    ("Sarah Davis", 7, "Shortstop", "Starter", "sarah.davis@email.com"),
    ("Tom Wilson", 23, "Outfield", "Bench", "tom.wilson@email.com"),
];

const DEMO_GAMES: [(&str, &str, &str, &str, HomeAway, GameStatus); 2] = [
    ("Tigers", "2025-07-10", "15:00", "Central Park Field 1", HomeAway::Home, GameStatus::Upcoming),
    ("Lions", "2025-07-05", "14:00", "Lions Stadium", HomeAway::Away, GameStatus::Completed),
];

pub async fn seed_demo(db: &DatabaseConnection) -> Result<SeedReport, SeedError> {
    info!("Seeding demo data");

    let password_hash = hash_password(DEMO_PASSWORD)?;
    let txn = db.begin().await?;
    let mut report = SeedReport::default();
    let now = Utc::now();

    let mut members = Vec::with_capacity(DEMO_USERS.len());
    for (name, email, role) in DEMO_USERS {
        let existing = User::find()
            .filter(user::Column::Email.eq(email))
            .one(&txn)
            .await?;
        let row = match existing {
            Some(row) => row,
            None => {
                report.users += 1;
                user::ActiveModel {
                    name: Set(name.to_string()),
                    email: Set(email.to_string()),
                    password_hash: Set(password_hash.clone()),
                    role: Set(role),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await?
            }
        };
        members.push(row);
    }

    let coach_id = members[0].id;
    let team = match Team::find()
        .filter(team::Column::InviteCode.eq(DEMO_INVITE_CODE))
        .one(&txn)
        .await?
    {
        Some(team) => team,
        None => {
            report.teams += 1;
            team::ActiveModel {
                name: Set("Eagles Baseball".to_string()),
                season: Set("2025 Spring".to_string()),
                admin_id: Set(coach_id),
                invite_code: Set(DEMO_INVITE_CODE.to_string()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?
        }
    };

    for member in &members {
        let exists = TeamMembership::find_by_id((member.id, team.id))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            report.memberships += 1;
            team_membership::ActiveModel {
                user_id: Set(member.id),
                team_id: Set(team.id),
                role: Set(member.role),
                joined_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
    }

    for (name, jersey, position, depth, email) in DEMO_PLAYERS {
        let exists = Player::find()
            .filter(player::Column::TeamId.eq(team.id))
            .filter(player::Column::JerseyNumber.eq(jersey))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            report.players += 1;
            player::ActiveModel {
                team_id: Set(team.id),
                name: Set(name.to_string()),
                jersey_number: Set(jersey),
                position: Set(Some(position.to_string())),
                role: Set(Some(depth.to_string())),
                email: Set(Some(email.to_string())),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    for (opponent, date, time, location, home_away, status) in DEMO_GAMES {
        let game_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| SeedError::Fixture(format!("{}: {}", date, e)))?;
        let game_time = NaiveTime::parse_from_str(time, "%H:%M")
            .map_err(|e| SeedError::Fixture(format!("{}: {}", time, e)))?;

        let exists = Game::find()
            .filter(game::Column::TeamId.eq(team.id))
            .filter(game::Column::Opponent.eq(opponent))
            .filter(game::Column::GameDate.eq(game_date))
            .one(&txn)
            .await?
            .is_some();
        if !exists {
            report.games += 1;
            game::ActiveModel {
                team_id: Set(team.id),
                opponent: Set(opponent.to_string()),
                game_date: Set(game_date),
                game_time: Set(game_time),
                location: Set(Some(location.to_string())),
                home_away: Set(home_away),
                status: Set(status),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    info!(
        "Demo seed complete: {} users, {} teams, {} memberships, {} players, {} games inserted",
        report.users, report.teams, report.memberships, report.players, report.games
    );

    Ok(report)
}
