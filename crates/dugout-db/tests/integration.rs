//! Integration tests for dugout-db
//!
//! Run against a real SQLite in-memory database with migrations applied.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use dugout_db::entities::game::{GameStatus, HomeAway};
use dugout_db::entities::media::MediaKind;
use dugout_db::entities::user::Role;
use dugout_db::entities::{game, media, player, player_stat, team, team_membership, user};
use dugout_db::{connect, membership, migrate, queries, seed, violation, Violation};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, Set};

async fn setup_test_db() -> DatabaseConnection {
    let db = connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    migrate(&db).await.expect("Failed to run migrations");

    db
}

async fn insert_user(db: &DatabaseConnection, email: &str, role: Role) -> user::Model {
    user::ActiveModel {
        name: Set(format!("User {}", email)),
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$placeholder".to_string()),
        role: Set(role),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert user")
}

async fn insert_team(db: &DatabaseConnection, name: &str, admin_id: i32, code: &str) -> team::Model {
    team::ActiveModel {
        name: Set(name.to_string()),
        season: Set("2025 Spring".to_string()),
        admin_id: Set(admin_id),
        invite_code: Set(code.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to insert team")
}

async fn join_team(db: &DatabaseConnection, user_id: i32, team_id: i32, role: Role) {
    team_membership::ActiveModel {
        user_id: Set(user_id),
        team_id: Set(team_id),
        role: Set(role),
        joined_at: Set(Utc::now()),
    }
    .insert(db)
    .await
    .expect("Failed to insert membership");
}

fn new_player(team_id: i32, name: &str, jersey: i32) -> player::ActiveModel {
    player::ActiveModel {
        team_id: Set(team_id),
        name: Set(name.to_string()),
        jersey_number: Set(jersey),
        position: Set(None),
        role: Set(None),
        email: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

fn new_game(team_id: i32, opponent: &str, date: &str, time: &str) -> game::ActiveModel {
    game::ActiveModel {
        team_id: Set(team_id),
        opponent: Set(opponent.to_string()),
        game_date: Set(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
        game_time: Set(NaiveTime::parse_from_str(time, "%H:%M").unwrap()),
        location: Set(None),
        home_away: Set(HomeAway::Home),
        status: Set(GameStatus::Upcoming),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// Two teams with one admin each and a member of only the first team
struct TwoTeams {
    coach_a: user::Model,
    coach_b: user::Model,
    member_a: user::Model,
    team_a: team::Model,
    team_b: team::Model,
}

async fn two_teams(db: &DatabaseConnection) -> TwoTeams {
    let coach_a = insert_user(db, "coach-a@x.com", Role::Admin).await;
    let coach_b = insert_user(db, "coach-b@x.com", Role::Admin).await;
    let member_a = insert_user(db, "member-a@x.com", Role::Player).await;

    let team_a = insert_team(db, "Eagles", coach_a.id, "EAGLES").await;
    let team_b = insert_team(db, "Hawks", coach_b.id, "HAWKS").await;

    join_team(db, coach_a.id, team_a.id, Role::Admin).await;
    join_team(db, coach_b.id, team_b.id, Role::Admin).await;
    join_team(db, member_a.id, team_a.id, Role::Player).await;

    TwoTeams {
        coach_a,
        coach_b,
        member_a,
        team_a,
        team_b,
    }
}

#[tokio::test]
async fn test_migrations_run_successfully() {
    let db = connect("sqlite::memory:").await.expect("Failed to connect");

    let backend = db.get_database_backend();
    assert!(matches!(backend, sea_orm::DatabaseBackend::Sqlite));
    assert!(migrate(&db).await.is_ok());
}

#[tokio::test]
async fn test_teams_for_lists_memberships_with_admin_flag() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    let coach_teams = membership::teams_for(&db, fx.coach_a.id).await.unwrap();
    assert_eq!(coach_teams.len(), 1);
    assert_eq!(coach_teams[0].team_id, fx.team_a.id);
    assert_eq!(coach_teams[0].team_name, "Eagles");
    assert!(coach_teams[0].is_admin);

    let member_teams = membership::teams_for(&db, fx.member_a.id).await.unwrap();
    assert_eq!(member_teams.len(), 1);
    assert_eq!(member_teams[0].role, Role::Player);
    assert!(!member_teams[0].is_admin);

    let stranger = insert_user(&db, "nobody@x.com", Role::Parent).await;
    assert!(membership::teams_for(&db, stranger.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_is_team_admin_uses_admin_id_not_membership_role() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    assert!(membership::is_team_admin(&db, fx.coach_a.id, fx.team_a.id).await.unwrap());
    assert!(!membership::is_team_admin(&db, fx.coach_a.id, fx.team_b.id).await.unwrap());

    // A membership that says "admin" does not make the user the team admin
    let assistant = insert_user(&db, "assistant@x.com", Role::Admin).await;
    join_team(&db, assistant.id, fx.team_a.id, Role::Admin).await;
    assert!(!membership::is_team_admin(&db, assistant.id, fx.team_a.id).await.unwrap());

    // Unknown team
    assert!(!membership::is_team_admin(&db, fx.coach_a.id, 9999).await.unwrap());
}

#[tokio::test]
async fn test_find_team_by_invite_code() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    let found = membership::find_team_by_invite_code(&db, "HAWKS").await.unwrap();
    assert_eq!(found.map(|t| t.id), Some(fx.team_b.id));

    assert!(membership::find_team_by_invite_code(&db, "hawks")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_scoped_reads_never_cross_teams() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    let pa = new_player(fx.team_a.id, "Sarah Davis", 7).insert(&db).await.unwrap();
    let pb = new_player(fx.team_b.id, "Hawk Player", 7).insert(&db).await.unwrap();
    let ga = new_game(fx.team_a.id, "Tigers", "2025-07-10", "15:00").insert(&db).await.unwrap();
    let gb = new_game(fx.team_b.id, "Lions", "2025-07-11", "15:00").insert(&db).await.unwrap();

    for (player_id, game_id) in [(pa.id, ga.id), (pb.id, gb.id)] {
        player_stat::ActiveModel {
            player_id: Set(player_id),
            game_id: Set(game_id),
            at_bats: Set(4),
            hits: Set(2),
            rbis: Set(1),
            runs: Set(1),
            strikeouts: Set(1),
            walks: Set(0),
            innings_pitched: Set(0.0),
            earned_runs: Set(0),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    for (team_id, uploader) in [(fx.team_a.id, fx.coach_a.id), (fx.team_b.id, fx.coach_b.id)] {
        media::ActiveModel {
            team_id: Set(team_id),
            game_id: Set(None),
            title: Set("Team photo".to_string()),
            description: Set(None),
            file_type: Set(MediaKind::Image),
            file_url: Set(format!("/uploads/file-{}.jpg", team_id)),
            file_size: Set(1024),
            uploaded_by: Set(uploader),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
    }

    let players = queries::players_for_user(&db, fx.member_a.id).await.unwrap();
    assert_eq!(players.iter().map(|p| p.id).collect::<Vec<_>>(), vec![pa.id]);

    let games = queries::games_for_user(&db, fx.member_a.id).await.unwrap();
    assert_eq!(games.iter().map(|g| g.id).collect::<Vec<_>>(), vec![ga.id]);

    let stats = queries::stats_for_user(&db, fx.member_a.id).await.unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].player_id, pa.id);

    let media = queries::media_for_user(&db, fx.member_a.id).await.unwrap();
    assert_eq!(media.len(), 1);
    assert_eq!(media[0].team_id, fx.team_a.id);

    let stranger = insert_user(&db, "nobody@x.com", Role::Parent).await;
    assert!(queries::players_for_user(&db, stranger.id).await.unwrap().is_empty());
    assert!(queries::games_for_user(&db, stranger.id).await.unwrap().is_empty());
    assert!(queries::stats_for_user(&db, stranger.id).await.unwrap().is_empty());
    assert!(queries::media_for_user(&db, stranger.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_games_ordered_by_date_then_time_descending() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    let early = new_game(fx.team_a.id, "Early", "2025-07-05", "10:00").insert(&db).await.unwrap();
    let late = new_game(fx.team_a.id, "Late", "2025-07-05", "18:00").insert(&db).await.unwrap();
    let next = new_game(fx.team_a.id, "Next", "2025-07-12", "09:00").insert(&db).await.unwrap();

    let games = queries::games_for_user(&db, fx.coach_a.id).await.unwrap();
    let order: Vec<i32> = games.iter().map(|g| g.id).collect();
    assert_eq!(order, vec![next.id, late.id, early.id]);
}

fn new_media(team_id: i32, uploader: i32, title: &str, created_at: DateTime<Utc>) -> media::ActiveModel {
    media::ActiveModel {
        team_id: Set(team_id),
        game_id: Set(None),
        title: Set(title.to_string()),
        description: Set(None),
        file_type: Set(MediaKind::Image),
        file_url: Set(format!("/uploads/{}.jpg", title)),
        file_size: Set(2048),
        uploaded_by: Set(uploader),
        created_at: Set(created_at),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_media_newest_first() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;
    let now = Utc::now();

    // Inserted out of time order so ids do not decide it
    let morning = new_media(fx.team_a.id, fx.coach_a.id, "morning", now - Duration::hours(2))
        .insert(&db)
        .await
        .unwrap();
    let latest = new_media(fx.team_a.id, fx.coach_a.id, "latest", now)
        .insert(&db)
        .await
        .unwrap();
    let yesterday = new_media(fx.team_a.id, fx.coach_a.id, "yesterday", now - Duration::days(1))
        .insert(&db)
        .await
        .unwrap();

    let media = queries::media_for_user(&db, fx.member_a.id).await.unwrap();
    let order: Vec<i32> = media.iter().map(|m| m.id).collect();
    assert_eq!(order, vec![latest.id, morning.id, yesterday.id]);
}

#[tokio::test]
async fn test_duplicate_jersey_is_unique_violation() {
    let db = setup_test_db().await;
    let fx = two_teams(&db).await;

    let first = new_player(fx.team_a.id, "First", 12).insert(&db).await.unwrap();
    let err = new_player(fx.team_a.id, "Second", 12)
        .insert(&db)
        .await
        .unwrap_err();
    assert_eq!(violation(&err), Some(Violation::Unique));

    // Same number on another team is fine
    new_player(fx.team_b.id, "Other", 12).insert(&db).await.unwrap();

    let kept = player::Entity::find_by_id(first.id).one(&db).await.unwrap().unwrap();
    assert_eq!(kept.name, "First");
}

#[tokio::test]
async fn test_unknown_team_is_foreign_key_violation() {
    let db = setup_test_db().await;

    let err = new_player(4242, "Ghost", 1).insert(&db).await.unwrap_err();
    assert_eq!(violation(&err), Some(Violation::ForeignKey));
}

#[tokio::test]
async fn test_seed_demo_is_idempotent() {
    let db = setup_test_db().await;

    let first = seed::seed_demo(&db).await.expect("first seed");
    assert_eq!(first.users, 3);
    assert_eq!(first.teams, 1);
    assert_eq!(first.memberships, 3);
    assert_eq!(first.players, 3);
    assert_eq!(first.games, 2);

    let second = seed::seed_demo(&db).await.expect("second seed");
    assert_eq!(second, seed::SeedReport::default());

    let team = membership::find_team_by_invite_code(&db, seed::DEMO_INVITE_CODE)
        .await
        .unwrap()
        .expect("demo team");
    assert_eq!(team.name, "Eagles Baseball");

    let coach = user::Entity::find_by_id(team.admin_id).one(&db).await.unwrap().unwrap();
    assert_eq!(coach.email, "coach@team.com");
    assert_eq!(coach.role, Role::Admin);
    assert!(dugout_auth::verify_password(seed::DEMO_PASSWORD, &coach.password_hash).unwrap());

    let games = queries::games_for_user(&db, coach.id).await.unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].opponent, "Tigers");
}
