//! Unified error codes for Bazaar
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-service compatibility (gateway, RPC services, frontend).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Invalid request
    InvalidRequest = 5,
    /// Operation cancelled by the caller or its deadline
    Cancelled = 10,

    // ==================== 6xxx: Catalog ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is out of stock
    ProductOutOfStock = 6003,
    /// Unknown sort order
    InvalidSortOrder = 6201,
    /// min_price greater than max_price
    InvalidPriceRange = 6202,
    /// Rating filter outside 0..=5
    InvalidRatingFilter = 6203,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Catalog store unreachable
    BackendUnavailable = 9501,
    /// Suggestion cache unreachable
    CacheUnavailable = 9502,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::Cancelled => "Operation was cancelled",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductOutOfStock => "Product is out of stock",
            ErrorCode::InvalidSortOrder => "Unknown sort order",
            ErrorCode::InvalidPriceRange => "Minimum price exceeds maximum price",
            ErrorCode::InvalidRatingFilter => "Rating filter must be between 0 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::BackendUnavailable => "Catalog store is unavailable",
            ErrorCode::CacheUnavailable => "Suggestion cache is unavailable",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            5 => Ok(ErrorCode::InvalidRequest),
            10 => Ok(ErrorCode::Cancelled),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6003 => Ok(ErrorCode::ProductOutOfStock),
            6201 => Ok(ErrorCode::InvalidSortOrder),
            6202 => Ok(ErrorCode::InvalidPriceRange),
            6203 => Ok(ErrorCode::InvalidRatingFilter),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9501 => Ok(ErrorCode::BackendUnavailable),
            9502 => Ok(ErrorCode::CacheUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
