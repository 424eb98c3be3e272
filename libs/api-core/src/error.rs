//! Platform error taxonomy.
//!
//! Propagation policy: Validation and NotFound are terminal and reported
//! verbatim; dependency failures are surfaced as a generic 503 with full
//! context logged server-side; authentication and authorization messages
//! never reveal whether an account exists. Cache errors are swallowed at the
//! call site and should not reach this type on read paths.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Bad credentials at issue time. Always a generic message.
    #[error("Invalid credentials")]
    Authentication,

    /// Missing, expired, or revoked token on a protected call.
    #[error("{0}")]
    Authorization(String),

    /// Malformed input; field-level detail goes back to the caller.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate unique constraint. Watchlist adds map this to success-no-op
    /// before it ever becomes an error.
    #[error("{0}")]
    Conflict(String),

    /// Backing store or downstream service unreachable. The label names the
    /// dependency for logs; the response body stays generic.
    #[error("dependency unavailable: {0}")]
    DependencyUnavailable(&'static str),

    #[error("internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            AppError::Authentication => ("AUTHENTICATION_FAILURE", self.to_string()),
            AppError::Authorization(_) => ("AUTHORIZATION_FAILURE", self.to_string()),
            AppError::Validation(_) => ("VALIDATION_FAILURE", self.to_string()),
            AppError::NotFound(_) => ("NOT_FOUND", self.to_string()),
            AppError::Conflict(_) => ("CONFLICT", self.to_string()),
            // No internal detail leaves the process.
            AppError::DependencyUnavailable(_) => {
                ("DEPENDENCY_UNAVAILABLE", "Service unavailable".to_string())
            }
            AppError::Internal(_) => ("INTERNAL_FAILURE", "Internal server error".to_string()),
        };
        HttpResponse::build(self.status_code()).json(ErrorBody { error, message })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource".to_string()),
            // A lost insert race against a unique constraint is the caller's
            // conflict, not an infrastructure failure.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("Resource already exists".to_string())
            }
            other => {
                tracing::error!(error = %other, "database error");
                AppError::DependencyUnavailable("database")
            }
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        tracing::error!(error = %err, "redis error");
        AppError::DependencyUnavailable("redis")
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}
