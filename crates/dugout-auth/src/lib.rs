//! Identity primitives for the team API: session tokens and password hashing

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{SessionClaims, TokenError, TokenIssuer, TOKEN_VALIDITY_DAYS};
