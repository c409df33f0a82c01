//! Data models
//!
//! Shared between the gateway and the catalog core.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Product and seller ids are UUIDs; category ids are `i64`.

pub mod category;
pub mod discount;
pub mod product;
pub mod query;

// Re-exports
pub use category::*;
pub use discount::*;
pub use product::*;
pub use query::*;
