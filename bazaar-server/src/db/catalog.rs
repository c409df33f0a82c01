//! PostgreSQL catalog store
//!
//! `discount_price` is resolved in SQL from the active discount row (range
//! contains `now()`, latest `start_date` wins), the same rule
//! `pricing::active_discount` applies in memory.

use async_trait::async_trait;
use shared::models::{Category, Product, SearchQuery, SortOrder};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CatalogStore, DEFAULT_PAGE_SIZE, SubcategoryId};
use crate::error::{CoreError, CoreResult};

/// Product columns plus the active discount, shared by every product query
const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.name, p.description, p.preview_image_url, p.price,
           d.discounted_price AS discount_price,
           p.quantity, p.rating, p.reviews_count, p.status, p.seller_id
    FROM products p
    LEFT JOIN LATERAL (
        SELECT discounted_price
        FROM discounts
        WHERE product_id = p.id AND start_date <= now() AND end_date > now()
        ORDER BY start_date DESC
        LIMIT 1
    ) d ON TRUE
"#;

/// Final price expression matching `pricing::final_price`
const FINAL_PRICE: &str =
    "CASE WHEN d.discounted_price > 0 THEN d.discounted_price ELSE p.price END";

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
    page_size: i64,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }
}

/// ORDER BY clause for a sort; id is always the tie-breaker
fn order_by(sort: SortOrder) -> String {
    match sort {
        SortOrder::PriceAsc => format!("ORDER BY {FINAL_PRICE} ASC, p.id ASC"),
        SortOrder::PriceDesc => format!("ORDER BY {FINAL_PRICE} DESC, p.id ASC"),
        SortOrder::RatingAsc => "ORDER BY p.rating ASC, p.id ASC".to_string(),
        SortOrder::RatingDesc => "ORDER BY p.rating DESC, p.id ASC".to_string(),
        SortOrder::None => "ORDER BY p.id ASC".to_string(),
    }
}

/// Escape LIKE metacharacters so a name matches literally
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn products_by_name(&self, name: &str, query: &SearchQuery) -> CoreResult<Vec<Product>> {
        let sql = format!(
            r#"{PRODUCT_SELECT}
            WHERE p.status = 'approved'
              AND p.name ILIKE '%' || $1 || '%'
              AND {FINAL_PRICE} BETWEEN $2 AND $3
              AND p.rating >= $4
            {order}
            LIMIT $5 OFFSET $6"#,
            order = order_by(query.sort),
        );

        let rows: Vec<Product> = sqlx::query_as(&sql)
            .bind(escape_like(name))
            .bind(query.min_price)
            .bind(query.max_price)
            .bind(query.min_rating)
            .bind(self.page_size)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn category_by_name(&self, name: &str) -> CoreResult<Option<Category>> {
        let row: Option<Category> =
            sqlx::query_as("SELECT id, name FROM categories WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row)
    }

    async fn subcategories_of(&self, product_id: Uuid) -> CoreResult<Vec<SubcategoryId>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(CoreError::NotFound(format!("product {product_id}")));
        }

        let ids: Vec<SubcategoryId> = sqlx::query_scalar(
            "SELECT subcategory_id FROM product_subcategories \
             WHERE product_id = $1 ORDER BY subcategory_id",
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn sample_products_in(
        &self,
        subcategory_id: SubcategoryId,
        limit: u32,
    ) -> CoreResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            SELECT ps.product_id
            FROM product_subcategories ps
            JOIN products p ON p.id = ps.product_id
            WHERE ps.subcategory_id = $1 AND p.status = 'approved'
            ORDER BY RANDOM()
            LIMIT $2
            "#,
        )
        .bind(subcategory_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let sql = format!(
            r#"{PRODUCT_SELECT}
            JOIN unnest($1::uuid[]) WITH ORDINALITY AS wanted(id, ord) ON wanted.id = p.id
            ORDER BY wanted.ord"#
        );
        let rows: Vec<Product> = sqlx::query_as(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn approved_product_names(&self) -> CoreResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT name FROM products WHERE status = 'approved' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn category_names(&self) -> CoreResult<Vec<String>> {
        let names: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT name FROM categories ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(names)
    }
}
