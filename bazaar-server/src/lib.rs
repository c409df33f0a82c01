//! Marketplace catalog core
//!
//! Search with suggestion-driven fan-out, subcategory recommendations,
//! suggestion caching and pricing over a PostgreSQL catalog.

pub mod cache;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod logger;
pub mod pricing;
pub mod services;
pub mod state;
pub mod tasks;

pub use context::RequestContext;
pub use error::{CoreError, CoreResult};
