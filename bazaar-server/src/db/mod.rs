//! Catalog store access layer
//!
//! [`CatalogStore`] is the set of queries the search and recommendation
//! cores issue. [`PgCatalogStore`] answers them from PostgreSQL.

pub mod catalog;

use async_trait::async_trait;
use shared::models::{Category, Product, SearchQuery};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use uuid::Uuid;

use crate::config::Config;
use crate::error::CoreResult;

pub use catalog::PgCatalogStore;

/// Rows returned by one `products_by_name` call
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Subcategory identifier
pub type SubcategoryId = i64;

/// Catalog queries used by the core
///
/// Implementations must be safe to call concurrently from many tasks.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Approved products whose name contains `name`, filtered by the query's
    /// price/rating bounds, ordered by its sort and paged from its offset
    async fn products_by_name(&self, name: &str, query: &SearchQuery) -> CoreResult<Vec<Product>>;

    /// Category whose name equals `name` exactly
    async fn category_by_name(&self, name: &str) -> CoreResult<Option<Category>>;

    /// Subcategory memberships of a product; `NotFound` for an unknown product
    async fn subcategories_of(&self, product_id: Uuid) -> CoreResult<Vec<SubcategoryId>>;

    /// Up to `limit` random product ids from a subcategory
    async fn sample_products_in(
        &self,
        subcategory_id: SubcategoryId,
        limit: u32,
    ) -> CoreResult<Vec<Uuid>>;

    /// Bulk fetch in input order; unknown ids are skipped
    async fn products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>>;

    /// Distinct names of approved products
    async fn approved_product_names(&self) -> CoreResult<Vec<String>>;

    /// Distinct category names
    async fn category_names(&self) -> CoreResult<Vec<String>>;
}

/// Connect the catalog pool and apply migrations
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
