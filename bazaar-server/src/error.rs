//! Catalog core error type
//!
//! `CoreError` is what every store, cache and core operation returns. It
//! bridges infrastructure errors (`sqlx::Error`, `redis::RedisError`) and the
//! gateway-facing `AppError`, so `?` works from the SQL call all the way up.

use shared::error::{AppError, ErrorCode};
use shared::models::QueryError;
use thiserror::Error;

/// Error taxonomy of the catalog core
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Malformed request: bad query bounds, unknown sort, non-UUID seed
    #[error("invalid argument: {message}")]
    InvalidArgument { code: ErrorCode, message: String },

    /// Seed product unknown to the catalog store
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller cancelled or its deadline passed
    #[error("operation cancelled")]
    Cancelled,

    /// Catalog store unreachable
    #[error("catalog store unavailable: {0}")]
    BackendUnavailable(String),

    /// Suggestion cache unreachable
    #[error("suggestion cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn invalid(code: ErrorCode, message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidArgument { code, .. } => *code,
            CoreError::NotFound(_) => ErrorCode::ProductNotFound,
            CoreError::Cancelled => ErrorCode::Cancelled,
            CoreError::BackendUnavailable(_) => ErrorCode::BackendUnavailable,
            CoreError::CacheUnavailable(_) => ErrorCode::CacheUnavailable,
            CoreError::Internal(_) => ErrorCode::InternalError,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreError::Cancelled)
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => CoreError::NotFound("row".into()),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => CoreError::BackendUnavailable(e.to_string()),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for CoreError {
    fn from(e: redis::RedisError) -> Self {
        CoreError::CacheUnavailable(e.to_string())
    }
}

impl From<QueryError> for CoreError {
    fn from(e: QueryError) -> Self {
        let code = match &e {
            QueryError::UnknownSort(_) => ErrorCode::InvalidSortOrder,
            QueryError::PriceRange { .. } | QueryError::NegativePrice(_) => {
                ErrorCode::InvalidPriceRange
            }
            QueryError::RatingOutOfRange(_) => ErrorCode::InvalidRatingFilter,
            QueryError::NegativeOffset(_) => ErrorCode::InvalidRequest,
        };
        CoreError::invalid(code, e.to_string())
    }
}

impl From<CoreError> for AppError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Cancelled => AppError::cancelled(),
            CoreError::Internal(msg) => {
                tracing::error!(error = %msg, "Catalog core internal error");
                AppError::new(ErrorCode::InternalError)
            }
            CoreError::BackendUnavailable(msg) => {
                tracing::error!(error = %msg, "Catalog store unavailable");
                AppError::new(ErrorCode::BackendUnavailable)
            }
            other => AppError::with_message(other.code(), other.to_string()),
        }
    }
}

/// Convenience type alias for core results
pub type CoreResult<T> = Result<T, CoreError>;
