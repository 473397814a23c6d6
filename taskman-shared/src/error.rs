//! Service-level error taxonomy
//!
//! Stores return `sqlx::Error`; services convert it here so callers never
//! depend on the database driver's error type.

use crate::models::user::LOGIN_UNIQUE_CONSTRAINT;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by the task and user services
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Input rejected before any store access
    #[error("validation failed: {0}")]
    Validation(String),

    /// Target entity does not exist (or is not visible to the caller)
    #[error("not found: {0}")]
    NotFound(String),

    /// Business key already taken
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Caller's role does not allow the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Unknown login or wrong password
    #[error("invalid login or password")]
    InvalidCredentials,

    /// Store failure
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl ServiceError {
    /// Short machine-readable code, used in API error bodies
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::AlreadyExists(_) => "already_exists",
            ServiceError::Forbidden(_) => "forbidden",
            ServiceError::InvalidCredentials => "invalid_credentials",
            ServiceError::Infrastructure(_) => "internal_error",
        }
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.constraint() == Some(LOGIN_UNIQUE_CONSTRAINT) {
                return ServiceError::AlreadyExists("login is already taken".to_string());
            }
        }

        tracing::error!(error = %err, "store operation failed");
        ServiceError::Infrastructure(err.to_string())
    }
}
