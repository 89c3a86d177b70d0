use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::error;

use crate::schemas::ErrorResponse;

/// Error taxonomy for the HTTP layer.
///
/// Every handler returns one of these instead of a bare status code, so
/// the status mapping and the JSON error body live in exactly one place.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing input; the caller must fix the request
    #[error("{0}")]
    Validation(String),

    /// Missing, expired, or invalid token (or bad login credentials)
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but the role/ownership rules refuse the operation
    #[error("Insufficient permissions")]
    Forbidden,

    /// The target entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation (duplicate email, duplicate favorite)
    #[error("{0}")]
    Conflict(String),

    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Unexpected internal failure; details are logged, never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::Forbidden => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Database(_) => "DATABASE_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<auth::AuthError> for ApiError {
    fn from(err: auth::AuthError) -> Self {
        match err {
            // Bad credentials and bad tokens look identical from outside
            auth::AuthError::InvalidCredentials | auth::AuthError::Unauthenticated => {
                ApiError::Unauthenticated
            }
            auth::AuthError::Forbidden => ApiError::Forbidden,
            auth::AuthError::InvalidRole(role) => {
                ApiError::Validation(format!("Invalid role: {}", role))
            }
            auth::AuthError::DuplicateEmail => {
                ApiError::Conflict("Email already registered".to_string())
            }
            auth::AuthError::Database(db_error) => ApiError::Database(db_error),
            auth::AuthError::Hash(detail) | auth::AuthError::Token(detail) => {
                ApiError::Internal(detail)
            }
        }
    }
}

impl From<sea_orm::TransactionError<sea_orm::DbErr>> for ApiError {
    fn from(err: sea_orm::TransactionError<sea_orm::DbErr>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(db_error) => ApiError::Database(db_error),
            sea_orm::TransactionError::Transaction(db_error) => ApiError::Database(db_error),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match &self {
            ApiError::Database(db_error) => {
                error!("Database error while handling request: {}", db_error);
                "Internal server error".to_string()
            }
            ApiError::Internal(detail) => {
                error!("Internal error while handling request: {}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}
