//! Route handlers, one module per resource

pub mod auth;
pub mod games;
pub mod media;
pub mod players;
pub mod stats;
pub mod system;
pub mod teams;
