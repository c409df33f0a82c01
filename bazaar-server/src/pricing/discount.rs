//! Active discount resolution

use chrono::{DateTime, Utc};
use shared::models::{Discount, Product};

/// The discount row in effect at `now`
///
/// Among rows whose range contains `now`, the one that started last wins.
pub fn active_discount(discounts: &[Discount], now: DateTime<Utc>) -> Option<&Discount> {
    discounts
        .iter()
        .filter(|d| d.is_active_at(now))
        .max_by_key(|d| d.start_date)
}

/// Set `discount_price` from the product's active discount row
///
/// Rows belonging to other products are ignored. With no active row the
/// discount price is cleared.
pub fn apply_active_discount(product: &mut Product, discounts: &[Discount], now: DateTime<Utc>) {
    let own: Vec<Discount> = discounts
        .iter()
        .filter(|d| d.product_id == product.id)
        .cloned()
        .collect();
    product.discount_price = active_discount(&own, now).map(|d| d.discounted_price);
}
