//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// A single field-level validation failure.
///
/// Validation never stops at the first problem: every failing field is
/// collected and reported together in one response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending request field (e.g. `"valor"`)
    pub field: &'static str,

    /// Human-readable description of the rule that was violated
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Validation Errors**: Request payload fails schema rules (400)
/// - **Conflict Errors**: Unique-constraint violations such as a duplicate email (400)
/// - **Authentication Errors**: Missing/invalid/expired tokens, bad credentials (401)
/// - **Resource Errors**: Requested resources not found or not owned by the caller (404)
/// - **Internal Errors**: Database, hashing, or token-creation faults (500)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// One or more request fields violated a validation rule.
    ///
    /// Returns HTTP 400 Bad Request with per-field details.
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// A user with the requested email already exists.
    ///
    /// Also produced when a concurrent registration wins the race and the
    /// database unique constraint fires. Returns HTTP 400 Bad Request.
    #[error("User with this email already exists")]
    EmailTaken,

    /// No `Authorization: Bearer <token>` header on a protected route.
    #[error("Access token is required")]
    MissingToken,

    /// Token is malformed or its signature does not verify.
    #[error("Invalid token")]
    InvalidToken,

    /// Token signature is fine but the token is past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// Token verified but the embedded user id is not a canonical UUID.
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Unknown email or wrong password.
    ///
    /// Deliberately a single variant with a single message, so callers
    /// cannot tell registered emails apart from unregistered ones.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The authenticated user no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Transaction does not exist or belongs to a different user.
    ///
    /// Both causes return the identical 404 so ownership is never leaked.
    #[error("Financial transaction not found")]
    TransactionNotFound,

    /// Database operation failed (connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Password hashing or verification failed.
    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    /// Signing a new token failed.
    #[error("Token creation error")]
    TokenCreation,

    /// An unexpected internal fault (e.g. a panicked blocking task).
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Map a unique-constraint violation on the email column to [`AppError::EmailTaken`].
    ///
    /// Two simultaneous registrations with the same email can both pass the
    /// pre-insert existence check; the database constraint is the backstop
    /// and its violation must surface as the same user-facing error.
    pub fn from_unique_email(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::Database(db_error) if db_error.is_unique_violation() => {
                AppError::EmailTaken
            }
            _ => AppError::Database(error),
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Validation errors additionally carry a `details` array naming every
/// failing field. Internal faults (database, hashing, token creation) are
/// logged server-side with full detail and reach the client only as a
/// generic 500 message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Validation carries structured per-field details alongside the envelope
        if let AppError::Validation(details) = &self {
            let body = Json(json!({
                "error": {
                    "code": "validation_error",
                    "message": self.to_string(),
                    "details": details,
                }
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }

        // Map each remaining variant to (HTTP status, error code, message)
        let (status, code, message) = match &self {
            AppError::Validation(_) => unreachable!("handled above"),
            AppError::EmailTaken => (StatusCode::BAD_REQUEST, "email_taken", self.to_string()),
            AppError::MissingToken => {
                (StatusCode::UNAUTHORIZED, "missing_token", self.to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "invalid_token", self.to_string())
            }
            AppError::TokenExpired => {
                (StatusCode::UNAUTHORIZED, "token_expired", self.to_string())
            }
            AppError::InvalidTokenFormat => (
                StatusCode::UNAUTHORIZED,
                "invalid_token_format",
                self.to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", self.to_string()),
            AppError::TransactionNotFound => (
                StatusCode::NOT_FOUND,
                "transaction_not_found",
                self.to_string(),
            ),
            AppError::Database(_) | AppError::Hash(_) | AppError::TokenCreation | AppError::Internal => {
                // Full detail stays server-side; clients get a generic message
                tracing::error!("internal error: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn validation_errors_map_to_400() {
        let error = AppError::Validation(vec![FieldError::new("valor", "Valor must be positive")]);
        assert_eq!(status_of(error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn authentication_errors_map_to_401() {
        assert_eq!(status_of(AppError::MissingToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_of(AppError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of(AppError::InvalidTokenFormat),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::InvalidCredentials),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn missing_resources_map_to_404() {
        assert_eq!(status_of(AppError::UserNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status_of(AppError::TransactionNotFound),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn internal_faults_map_to_500_with_generic_message() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn duplicate_email_maps_to_400() {
        assert_eq!(status_of(AppError::EmailTaken), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn non_unique_violations_stay_database_errors() {
        let mapped = AppError::from_unique_email(sqlx::Error::PoolClosed);
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
