//! Initial schema: users, teams, memberships, roster, schedule, stats, media

use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // 1. users
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Name, 255))
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len(User::PasswordHash, 255))
                    .col(string_len(User::Role, 32).default("player"))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 2. teams
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Team::Table)
                    .if_not_exists()
                    .col(pk_auto(Team::Id))
                    .col(string_len(Team::Name, 255))
                    .col(string_len(Team::Season, 64))
                    .col(integer(Team::AdminId))
                    .col(string_len(Team::InviteCode, 64).unique_key())
                    .col(
                        timestamp_with_time_zone(Team::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_teams_admin_id")
                            .from(Team::Table, Team::AdminId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_teams_admin_id")
                    .table(Team::Table)
                    .col(Team::AdminId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 3. team_memberships (one row per user per team)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(TeamMembership::Table)
                    .if_not_exists()
                    .col(integer(TeamMembership::UserId))
                    .col(integer(TeamMembership::TeamId))
                    .col(string_len(TeamMembership::Role, 32).default("player"))
                    .col(
                        timestamp_with_time_zone(TeamMembership::JoinedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(TeamMembership::UserId)
                            .col(TeamMembership::TeamId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_memberships_user_id")
                            .from(TeamMembership::Table, TeamMembership::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_team_memberships_team_id")
                            .from(TeamMembership::Table, TeamMembership::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_team_memberships_team_id")
                    .table(TeamMembership::Table)
                    .col(TeamMembership::TeamId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 4. players
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Player::Table)
                    .if_not_exists()
                    .col(pk_auto(Player::Id))
                    .col(integer(Player::TeamId))
                    .col(string_len(Player::Name, 255))
                    .col(integer(Player::JerseyNumber))
                    .col(string_len_null(Player::Position, 64))
                    .col(string_len_null(Player::Role, 64))
                    .col(string_len_null(Player::Email, 255))
                    .col(
                        timestamp_with_time_zone(Player::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_players_team_id")
                            .from(Player::Table, Player::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_players_team_jersey")
                    .table(Player::Table)
                    .col(Player::TeamId)
                    .col(Player::JerseyNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 5. games
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Game::Table)
                    .if_not_exists()
                    .col(pk_auto(Game::Id))
                    .col(integer(Game::TeamId))
                    .col(string_len(Game::Opponent, 255))
                    .col(date(Game::GameDate))
                    .col(time(Game::GameTime))
                    .col(string_len_null(Game::Location, 255))
                    .col(string_len(Game::HomeAway, 8).default("home"))
                    .col(string_len(Game::Status, 16).default("upcoming"))
                    .col(
                        timestamp_with_time_zone(Game::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_team_id")
                            .from(Game::Table, Game::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_games_team_date")
                    .table(Game::Table)
                    .col(Game::TeamId)
                    .col(Game::GameDate)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 6. player_stats (one line per player per game)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(PlayerStat::Table)
                    .if_not_exists()
                    .col(pk_auto(PlayerStat::Id))
                    .col(integer(PlayerStat::PlayerId))
                    .col(integer(PlayerStat::GameId))
                    .col(integer(PlayerStat::AtBats).default(0))
                    .col(integer(PlayerStat::Hits).default(0))
                    .col(integer(PlayerStat::Rbis).default(0))
                    .col(integer(PlayerStat::Runs).default(0))
                    .col(integer(PlayerStat::Strikeouts).default(0))
                    .col(integer(PlayerStat::Walks).default(0))
                    .col(double(PlayerStat::InningsPitched).default(0.0))
                    .col(integer(PlayerStat::EarnedRuns).default(0))
                    .col(
                        timestamp_with_time_zone(PlayerStat::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_stats_player_id")
                            .from(PlayerStat::Table, PlayerStat::PlayerId)
                            .to(Player::Table, Player::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_player_stats_game_id")
                            .from(PlayerStat::Table, PlayerStat::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_player_stats_player_game")
                    .table(PlayerStat::Table)
                    .col(PlayerStat::PlayerId)
                    .col(PlayerStat::GameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // 7. media
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Media::Table)
                    .if_not_exists()
                    .col(pk_auto(Media::Id))
                    .col(integer(Media::TeamId))
                    .col(integer_null(Media::GameId))
                    .col(string_len(Media::Title, 255))
                    .col(text_null(Media::Description))
                    .col(string_len(Media::FileType, 8))
                    .col(string_len(Media::FileUrl, 512))
                    .col(big_integer(Media::FileSize))
                    .col(integer(Media::UploadedBy))
                    .col(
                        timestamp_with_time_zone(Media::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_team_id")
                            .from(Media::Table, Media::TeamId)
                            .to(Team::Table, Team::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_game_id")
                            .from(Media::Table, Media::GameId)
                            .to(Game::Table, Game::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_media_uploaded_by")
                            .from(Media::Table, Media::UploadedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_media_team_created")
                    .table(Media::Table)
                    .col(Media::TeamId)
                    .col(Media::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reverse order of creation so foreign keys never dangle
        manager
            .drop_table(Table::drop().table(Media::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PlayerStat::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Game::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Player::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TeamMembership::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Team::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Team {
    #[sea_orm(iden = "teams")]
    Table,
    Id,
    Name,
    Season,
    AdminId,
    InviteCode,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeamMembership {
    #[sea_orm(iden = "team_memberships")]
    Table,
    UserId,
    TeamId,
    Role,
    JoinedAt,
}

#[derive(DeriveIden)]
enum Player {
    #[sea_orm(iden = "players")]
    Table,
    Id,
    TeamId,
    Name,
    JerseyNumber,
    Position,
    Role,
    Email,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Game {
    #[sea_orm(iden = "games")]
    Table,
    Id,
    TeamId,
    Opponent,
    GameDate,
    GameTime,
    Location,
    HomeAway,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlayerStat {
    #[sea_orm(iden = "player_stats")]
    Table,
    Id,
    PlayerId,
    GameId,
    AtBats,
    Hits,
    Rbis,
    Runs,
    Strikeouts,
    Walks,
    InningsPitched,
    EarnedRuns,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Media {
    #[sea_orm(iden = "media")]
    Table,
    Id,
    TeamId,
    GameId,
    Title,
    Description,
    FileType,
    FileUrl,
    FileSize,
    UploadedBy,
    CreatedAt,
}
