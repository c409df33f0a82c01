//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Moderation status of a product
///
/// Only [`ProductStatus::Approved`] products are visible to buyers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "product_status", rename_all = "lowercase")
)]
pub enum ProductStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product entity
///
/// `discount_price` holds the discounted price of the currently active
/// discount row, `None` when no row is active. `Some(0)` is a real value and
/// means the active row carries no price reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub preview_image_url: Option<String>,
    pub price: Decimal,
    pub discount_price: Option<Decimal>,
    /// Units in stock
    pub quantity: i32,
    /// Average review score, 0.0 ..= 5.0
    pub rating: f64,
    pub reviews_count: i32,
    pub status: ProductStatus,
    pub seller_id: Uuid,
}

impl Product {
    pub fn is_approved(&self) -> bool {
        self.status == ProductStatus::Approved
    }
}
