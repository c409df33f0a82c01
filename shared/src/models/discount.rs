//! Discount Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A time-boxed discount row
///
/// A product may have several rows; the active one is resolved by
/// `pricing::active_discount` (range contains now, latest `start_date` wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub product_id: Uuid,
    pub discounted_price: Decimal,
    pub start_date: DateTime<Utc>,
    /// Exclusive upper bound
    pub end_date: DateTime<Utc>,
}

impl Discount {
    /// Whether `at` falls inside `[start_date, end_date)`
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at < self.end_date
    }
}
