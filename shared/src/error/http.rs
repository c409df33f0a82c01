//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code the gateway should answer with
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::ProductNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::ProductOutOfStock => StatusCode::CONFLICT,

            // 499 Client Closed Request (nginx convention)
            Self::Cancelled => {
                StatusCode::from_u16(499).unwrap_or(StatusCode::REQUEST_TIMEOUT)
            }

            // 503 Service Unavailable (transient errors, client can retry)
            Self::BackendUnavailable | Self::CacheUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation errors)
            Self::InvalidRequest
            | Self::InvalidSortOrder
            | Self::InvalidPriceRange
            | Self::InvalidRatingFilter => StatusCode::BAD_REQUEST,
        }
    }
}
