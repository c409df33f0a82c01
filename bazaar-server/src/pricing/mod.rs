//! Pricing helpers
//!
//! The user-facing price of a product and the arithmetic built on it.

mod basket;
mod discount;

use rust_decimal::Decimal;
use shared::models::Product;

pub use basket::{BasketLine, basket_total};
pub use discount::{active_discount, apply_active_discount};

/// Price a buyer pays for one unit
///
/// The discount price when it is present and positive, the list price
/// otherwise. A zero discount price means "no reduction", never "free".
pub fn final_price(product: &Product) -> Decimal {
    match product.discount_price {
        Some(discounted) if discounted > Decimal::ZERO => discounted,
        _ => product.price,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use rust_decimal::Decimal;
    use shared::models::{Product, ProductStatus};
    use uuid::Uuid;

    pub fn product(id: u128, price: i64, discount: Option<i64>) -> Product {
        Product {
            id: Uuid::from_u128(id),
            name: format!("product-{id}"),
            description: String::new(),
            preview_image_url: None,
            price: Decimal::new(price, 2),
            discount_price: discount.map(|d| Decimal::new(d, 2)),
            quantity: 5,
            rating: 4.0,
            reviews_count: 0,
            status: ProductStatus::Approved,
            seller_id: Uuid::nil(),
        }
    }
}
