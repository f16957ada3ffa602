//! Request shape validation
//!
//! Every check for a request runs and all failures are reported together as
//! one `ApiError::Validation`.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex_lite::Regex;

use dugout_db::entities::game::{GameStatus, HomeAway};
use dugout_db::entities::user::Role;

use crate::error::ApiError;
use crate::models::{
    CreateGameRequest, CreatePlayerRequest, CreateStatRequest, FieldError, LoginRequest,
    RegisterRequest,
};

pub const MIN_NAME_LEN: usize = 2;
pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Trim and lower-case an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn finish<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, ApiError> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validated registration
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub code: String,
    pub role: Role,
}

pub fn registration(req: RegisterRequest) -> Result<Registration, ApiError> {
    let mut errors = Vec::new();

    let name = trimmed(&req.name);
    if name.chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {} characters", MIN_NAME_LEN),
        ));
    }

    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    let password = req.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
        ));
    }

    let code = trimmed(&req.code);
    if code.is_empty() {
        errors.push(FieldError::new("code", "Registration code is required"));
    }

    let role = match req.role.as_deref().map(|r| r.parse::<Role>()) {
        Some(Ok(role)) if role.is_self_assignable() => Some(role),
        _ => {
            errors.push(FieldError::new("role", "Role must be 'player' or 'parent'"));
            None
        }
    };

    finish(errors, || Registration {
        name,
        email,
        password,
        code,
        role: role.unwrap_or(Role::Player),
    })
}

/// Validated login: normalized email and the raw password
pub fn login(req: LoginRequest) -> Result<(String, String), ApiError> {
    let mut errors = Vec::new();

    let email = normalize_email(req.email.as_deref().unwrap_or_default());
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }

    let password = req.password.unwrap_or_default();
    if password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }

    finish(errors, || (email, password))
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub team_id: i32,
    pub name: String,
    pub jersey_number: i32,
    pub position: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
}

pub fn new_player(req: CreatePlayerRequest) -> Result<NewPlayer, ApiError> {
    let mut errors = Vec::new();

    if req.team_id.is_none() {
        errors.push(FieldError::new("teamId", "Team is required"));
    }

    let name = trimmed(&req.name);
    if name.is_empty() {
        errors.push(FieldError::new("name", "Name is required"));
    }

    match req.jersey_number {
        None => errors.push(FieldError::new("jerseyNumber", "Jersey number is required")),
        Some(n) if n < 0 => errors.push(FieldError::new(
            "jerseyNumber",
            "Jersey number cannot be negative",
        )),
        Some(_) => {}
    }

    let email = optional_text(req.email).map(|e| normalize_email(&e));
    if let Some(ref email) = email {
        if !is_valid_email(email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }
    }

    finish(errors, || NewPlayer {
        team_id: req.team_id.unwrap_or_default(),
        name,
        jersey_number: req.jersey_number.unwrap_or_default(),
        position: optional_text(req.position),
        role: optional_text(req.role),
        email,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewGame {
    pub team_id: i32,
    pub opponent: String,
    pub game_date: NaiveDate,
    pub game_time: NaiveTime,
    pub location: Option<String>,
    pub home_away: HomeAway,
    pub status: GameStatus,
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

pub fn new_game(req: CreateGameRequest) -> Result<NewGame, ApiError> {
    let mut errors = Vec::new();

    if req.team_id.is_none() {
        errors.push(FieldError::new("teamId", "Team is required"));
    }

    let opponent = trimmed(&req.opponent);
    if opponent.is_empty() {
        errors.push(FieldError::new("opponent", "Opponent is required"));
    }

    let game_date = NaiveDate::parse_from_str(&trimmed(&req.game_date), "%Y-%m-%d").ok();
    if game_date.is_none() {
        errors.push(FieldError::new("gameDate", "Date must be YYYY-MM-DD"));
    }

    let game_time = parse_time(&trimmed(&req.game_time));
    if game_time.is_none() {
        errors.push(FieldError::new("gameTime", "Time must be HH:MM"));
    }

    let home_away = match trimmed(&req.home_away).to_lowercase().as_str() {
        "home" => Some(HomeAway::Home),
        "away" => Some(HomeAway::Away),
        _ => {
            errors.push(FieldError::new("homeAway", "Must be 'home' or 'away'"));
            None
        }
    };

    let status = match optional_text(req.status).map(|s| s.to_lowercase()).as_deref() {
        None | Some("upcoming") => Some(GameStatus::Upcoming),
        Some("completed") => Some(GameStatus::Completed),
        Some("cancelled") => Some(GameStatus::Cancelled),
        Some(_) => {
            errors.push(FieldError::new(
                "status",
                "Must be 'upcoming', 'completed' or 'cancelled'",
            ));
            None
        }
    };

    match (game_date, game_time, home_away, status) {
        (Some(game_date), Some(game_time), Some(home_away), Some(status)) if errors.is_empty() => {
            Ok(NewGame {
                team_id: req.team_id.unwrap_or_default(),
                opponent,
                game_date,
                game_time,
                location: optional_text(req.location),
                home_away,
                status,
            })
        }
        _ => Err(ApiError::Validation(errors)),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStat {
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
}

pub fn new_stat(req: CreateStatRequest) -> Result<NewStat, ApiError> {
    let mut errors = Vec::new();

    if req.player_id.is_none() {
        errors.push(FieldError::new("playerId", "Player is required"));
    }
    if req.game_id.is_none() {
        errors.push(FieldError::new("gameId", "Game is required"));
    }

    let counters = [
        ("atBats", req.at_bats),
        ("hits", req.hits),
        ("rbis", req.rbis),
        ("runs", req.runs),
        ("strikeouts", req.strikeouts),
        ("walks", req.walks),
        ("earnedRuns", req.earned_runs),
    ];
    for (field, value) in counters {
        if value.is_some_and(|v| v < 0) {
            errors.push(FieldError::new(field, "Cannot be negative"));
        }
    }

    let innings_pitched = req.innings_pitched.unwrap_or(0.0);
    if !innings_pitched.is_finite() || innings_pitched < 0.0 {
        errors.push(FieldError::new("inningsPitched", "Cannot be negative"));
    }

    finish(errors, || NewStat {
        player_id: req.player_id.unwrap_or_default(),
        game_id: req.game_id.unwrap_or_default(),
        at_bats: req.at_bats.unwrap_or(0),
        hits: req.hits.unwrap_or(0),
        rbis: req.rbis.unwrap_or(0),
        runs: req.runs.unwrap_or(0),
        strikeouts: req.strikeouts.unwrap_or(0),
        walks: req.walks.unwrap_or(0),
        innings_pitched,
        earned_runs: req.earned_runs.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(err: ApiError) -> Vec<String> {
        match err {
            ApiError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn jo_lee() -> RegisterRequest {
        RegisterRequest {
            name: Some("  Jo Lee ".into()),
            email: Some(" Jo@X.com".into()),
            password: Some("secret1".into()),
            code: Some(" TEAM123 ".into()),
            role: Some("player".into()),
        }
    }

    #[test]
    fn test_registration_normalizes_fields() {
        let reg = registration(jo_lee()).unwrap();

        assert_eq!(reg.name, "Jo Lee");
        assert_eq!(reg.email, "jo@x.com");
        assert_eq!(reg.code, "TEAM123");
        assert_eq!(reg.role, Role::Player);
        assert_eq!(reg.password, "secret1");
    }

    #[test]
    fn test_registration_reports_every_bad_field() {
        let err = registration(RegisterRequest {
            name: Some(" J ".into()),
            email: Some("not-an-email".into()),
            password: Some("12345".into()),
            code: Some("   ".into()),
            role: Some("admin".into()),
        })
        .unwrap_err();

        assert_eq!(fields(err), vec!["name", "email", "password", "code", "role"]);
    }

    #[test]
    fn test_registration_missing_fields() {
        let err = registration(RegisterRequest::default()).unwrap_err();
        assert_eq!(fields(err).len(), 5);
    }

    #[test]
    fn test_registration_accepts_parent() {
        let reg = registration(RegisterRequest {
            role: Some("parent".into()),
            ..jo_lee()
        })
        .unwrap();
        assert_eq!(reg.role, Role::Parent);
    }

    #[test]
    fn test_login_requires_password() {
        let err = login(LoginRequest {
            email: Some("coach@team.com".into()),
            password: Some(String::new()),
        })
        .unwrap_err();
        assert_eq!(fields(err), vec!["password"]);

        let (email, _) = login(LoginRequest {
            email: Some("Coach@Team.com ".into()),
            password: Some("password".into()),
        })
        .unwrap();
        assert_eq!(email, "coach@team.com");
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_new_game_parses_date_and_short_time() {
        let game = new_game(CreateGameRequest {
            team_id: Some(1),
            opponent: Some("Tigers".into()),
            game_date: Some("2025-07-10".into()),
            game_time: Some("15:00".into()),
            location: Some("  ".into()),
            home_away: Some("Home".into()),
            status: None,
        })
        .unwrap();

        assert_eq!(game.game_date, NaiveDate::from_ymd_opt(2025, 7, 10).unwrap());
        assert_eq!(game.game_time, NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(game.home_away, HomeAway::Home);
        assert_eq!(game.status, GameStatus::Upcoming);
        assert_eq!(game.location, None);
    }

    #[test]
    fn test_new_game_rejects_bad_values() {
        let err = new_game(CreateGameRequest {
            team_id: Some(1),
            opponent: Some("Tigers".into()),
            game_date: Some("07/10/2025".into()),
            game_time: Some("3pm".into()),
            location: None,
            home_away: Some("neutral".into()),
            status: Some("postponed".into()),
        })
        .unwrap_err();

        assert_eq!(fields(err), vec!["gameDate", "gameTime", "homeAway", "status"]);
    }

    #[test]
    fn test_new_stat_defaults_counters_to_zero() {
        let stat = new_stat(CreateStatRequest {
            player_id: Some(3),
            game_id: Some(4),
            hits: Some(2),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(stat.hits, 2);
        assert_eq!(stat.at_bats, 0);
        assert_eq!(stat.innings_pitched, 0.0);
    }

    #[test]
    fn test_new_stat_rejects_negative_counters() {
        let err = new_stat(CreateStatRequest {
            player_id: Some(3),
            game_id: None,
            walks: Some(-1),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(fields(err), vec!["gameId", "walks"]);
    }

    #[test]
    fn test_new_player_requires_team_and_jersey() {
        let err = new_player(CreatePlayerRequest {
            name: Some("Sarah Davis".into()),
            ..Default::default()
        })
        .unwrap_err();

        assert_eq!(fields(err), vec!["teamId", "jerseyNumber"]);
    }
}
