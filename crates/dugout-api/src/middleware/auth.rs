//! Bearer token guard
//!
//! Runs once at the entry of every protected route. Extracts the token from
//! the `Authorization: Bearer <token>` header, verifies it, and makes the
//! caller available to handlers via Axum's Extension.
//!
//! Absence is told apart from forgery: a missing or unreadable token is 401,
//! a well-formed token with a bad signature or past its expiry is 403.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use dugout_auth::{TokenError, TokenIssuer};
use dugout_db::entities::user::Role;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Authenticated caller, as asserted by the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
    /// Global role at token issuance
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Token verification state shared across middleware instances
#[derive(Clone)]
pub struct GuardState {
    pub tokens: Arc<TokenIssuer>,
}

impl GuardState {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }
}

fn bearer_token(request: &Request) -> Result<&str, ApiError> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthenticated("Missing Authorization header".to_string()))?
        .to_str()
        .map_err(|_| ApiError::Unauthenticated("Unreadable Authorization header".to_string()))?;

    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError::Unauthenticated(
            "Invalid Authorization header format. Expected 'Bearer <token>'".to_string(),
        )
    })?;

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::Unauthenticated("Empty bearer token".to_string()));
    }

    Ok(token)
}

/// Authentication middleware for protected routes
///
/// # Errors
/// - 401 if the header is missing, not `Bearer`, empty, or the token is not a
///   decodable session token;
/// - 403 if the signature does not match or the token has expired.
pub async fn require_auth(
    State(state): State<GuardState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)?;

    let claims = state.tokens.verify(token).map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        match e {
            TokenError::InvalidSignature | TokenError::Expired => {
                ApiError::Forbidden("Invalid or expired token".to_string())
            }
            _ => ApiError::Unauthenticated("Malformed token".to_string()),
        }
    })?;

    let role: Role = claims.role.parse().map_err(|e| {
        warn!("Token for user {} carries {}", claims.user_id, e);
        ApiError::Unauthenticated("Malformed token".to_string())
    })?;

    let auth_user = AuthUser {
        user_id: claims.user_id,
        role,
    };
    debug!("Authenticated user {} ({})", auth_user.user_id, auth_user.role);

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Extension, Json, Router,
    };
    use chrono::{Duration, Utc};
    use tower::ServiceExt; // For oneshot()

    use crate::models::ErrorResponse;

    const SECRET: &[u8] = b"test-secret-key";

    async fn protected_handler(Extension(user): Extension<AuthUser>) -> Json<AuthUser> {
        Json(user)
    }

    fn create_test_app() -> Router {
        let tokens = Arc::new(TokenIssuer::new(SECRET).unwrap());

        Router::new()
            .route("/protected", get(protected_handler))
            .layer(middleware::from_fn_with_state(
                GuardState::new(tokens),
                require_auth,
            ))
    }

    async fn call(auth: Option<String>) -> (StatusCode, Vec<u8>) {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = auth {
            builder = builder.header("Authorization", value);
        }

        let response = create_test_app()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_valid_token_injects_user() {
        let token = TokenIssuer::new(SECRET).unwrap().issue(42, "admin").unwrap();

        let (status, body) = call(Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::OK);

        let user: AuthUser = serde_json::from_slice(&body).unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_admin());
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code.as_deref(), Some("UNAUTHENTICATED"));
        assert!(error.error.contains("Missing Authorization header"));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_401() {
        let (status, body) = call(Some("Basic dXNlcjpwYXNz".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(error.error.contains("Expected 'Bearer <token>'"));
    }

    #[tokio::test]
    async fn test_empty_bearer_is_401() {
        let (status, _) = call(Some("Bearer    ".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_garbage_token_is_401() {
        let (status, _) = call(Some("Bearer not.a.jwt".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_secret_is_403() {
        let token = TokenIssuer::new(b"wrong-secret-key")
            .unwrap()
            .issue(1, "player")
            .unwrap();

        let (status, body) = call(Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code.as_deref(), Some("FORBIDDEN"));
    }

    #[tokio::test]
    async fn test_expired_token_is_403() {
        let token = TokenIssuer::new(SECRET)
            .unwrap()
            .issue_at(1, "player", Utc::now() - Duration::days(8))
            .unwrap();

        let (status, _) = call(Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_unknown_role_is_401() {
        let token = TokenIssuer::new(SECRET).unwrap().issue(1, "superuser").unwrap();

        let (status, _) = call(Some(format!("Bearer {}", token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
