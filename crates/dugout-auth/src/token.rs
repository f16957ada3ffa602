//! Session tokens (HS256 JWT)
//!
//! A token asserts `{userId, role}` for a fixed window after issuance. Tokens
//! are stateless: there is no server-side session table, so a token cannot be
//! revoked before it expires. Rotating the signing secret invalidates every
//! outstanding token at once.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of an issued token
pub const TOKEN_VALIDITY_DAYS: i64 = 7;

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Database id of the user
    #[serde(rename = "userId")]
    pub user_id: i32,
    /// Global role at issuance time (`player`, `parent`, `admin`)
    pub role: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user_id: i32, role: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            role: role.into(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        }
    }

    /// Expired once `now` reaches `exp`; there is no leeway.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }
}

/// Token errors
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token signing secret is empty")]
    MissingSecret,

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Not a JWT, or the payload does not have the expected claims
    #[error("Malformed token")]
    Malformed,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,
}

impl TokenError {
    /// True for the failures of a token that parsed but did not check out.
    pub fn is_structural(&self) -> bool {
        matches!(self, TokenError::InvalidSignature | TokenError::Expired)
    }
}

/// Issues and verifies session tokens with one process-wide secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    pub fn issue(&self, user_id: i32, role: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, role, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: i32,
        role: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::new(user_id, role, issued_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            },
        )?;

        if data.claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
