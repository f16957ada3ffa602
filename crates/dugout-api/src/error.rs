//! API error type and its HTTP rendering

use axum::{
    extract::multipart::MultipartError,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dugout_auth::{PasswordError, TokenError};
use dugout_db::{violation, Violation};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;

use crate::models::{ErrorResponse, FieldError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    /// Bad reference or unusable body; also covers "not found"
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    /// Rendered as 400, like every other client mistake
    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidInput(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidInput(_) => "INVALID_INPUT",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Map a failed insert: unique violations become `Conflict(message)`,
    /// dangling references become `InvalidInput`.
    pub fn from_write(err: DbErr, conflict_message: &str) -> Self {
        match violation(&err) {
            Some(Violation::Unique) => ApiError::Conflict(conflict_message.to_string()),
            Some(Violation::ForeignKey) => {
                ApiError::InvalidInput("Referenced record does not exist".to_string())
            }
            None => err.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = Some(self.code().to_string());

        let body = match self {
            ApiError::Validation(fields) => ErrorResponse {
                error: "Validation failed".to_string(),
                code,
                details: Some(fields),
            },
            ApiError::Internal(detail) => {
                error!("Internal error: {}", detail);
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    code,
                    details: None,
                }
            }
            ApiError::InvalidInput(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg) => ErrorResponse {
                error: msg,
                code,
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Only the issuing side reaches this; the guard maps verification failures itself.
impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::InvalidInput(format!("Invalid upload: {}", err.body_text()))
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("Background task failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn render(err: ApiError) -> (StatusCode, ErrorResponse) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_and_code_per_variant() {
        let cases = [
            (ApiError::InvalidInput("x".into()), 400, "INVALID_INPUT"),
            (ApiError::Unauthenticated("x".into()), 401, "UNAUTHENTICATED"),
            (ApiError::Forbidden("x".into()), 403, "FORBIDDEN"),
            (ApiError::Conflict("x".into()), 400, "CONFLICT"),
        ];

        for (err, status, code) in cases {
            let (actual, body) = render(err).await;
            assert_eq!(actual.as_u16(), status);
            assert_eq!(body.code.as_deref(), Some(code));
            assert_eq!(body.error, "x");
        }
    }

    #[tokio::test]
    async fn test_validation_carries_field_details() {
        let (status, body) = render(ApiError::Validation(vec![FieldError::new(
            "email",
            "Invalid email address",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code.as_deref(), Some("VALIDATION_ERROR"));
        let details = body.details.unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "email");
    }

    #[tokio::test]
    async fn test_internal_hides_detail() {
        let err: ApiError = DbErr::Custom("connection refused to 10.0.0.5".into()).into();
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error, "Internal server error");
        assert!(body.details.is_none());
    }

    #[test]
    fn test_from_write_without_constraint_is_internal() {
        let err = ApiError::from_write(DbErr::Custom("boom".into()), "taken");
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
