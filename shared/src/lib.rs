//! Shared types for the Bazaar marketplace
//!
//! Catalog models, search query types and the unified error codes used by
//! the gateway and the catalog core.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCode};
pub use models::{
    Category, Discount, Product, ProductStatus, SearchQuery, SearchResults, SortOrder,
};
