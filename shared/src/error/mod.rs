//! Unified error system for Bazaar
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`AppError`]: Error type carried to the gateway, with code and message
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (products, categories, search queries)
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ProductNotFound);
//! assert_eq!(err.code.code(), 6001);
//!
//! let err = AppError::with_message(
//!     ErrorCode::InvalidPriceRange,
//!     "min_price must not exceed max_price",
//! );
//! assert_eq!(err.http_status(), http::StatusCode::BAD_REQUEST);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
