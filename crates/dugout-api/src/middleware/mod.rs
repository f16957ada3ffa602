//! API Middleware
//!
//! Authentication layer for protected routes. Ownership checks live in
//! [`crate::authz`] and are called by handlers.

pub mod auth;

pub use auth::{require_auth, AuthUser, GuardState};
