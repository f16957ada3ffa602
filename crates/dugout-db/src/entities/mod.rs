//! Database entities

pub mod game;
pub mod media;
pub mod player;
pub mod player_stat;
pub mod team;
pub mod team_membership;
pub mod user;

pub use game::Entity as Game;
pub use media::Entity as Media;
pub use player::Entity as Player;
pub use player_stat::Entity as PlayerStat;
pub use team::Entity as Team;
pub use team_membership::Entity as TeamMembership;
pub use user::Entity as User;

pub mod prelude {
    pub use super::game::Entity as Game;
    pub use super::media::Entity as Media;
    pub use super::player::Entity as Player;
    pub use super::player_stat::Entity as PlayerStat;
    pub use super::team::Entity as Team;
    pub use super::team_membership::Entity as TeamMembership;
    pub use super::user::Entity as User;
}
