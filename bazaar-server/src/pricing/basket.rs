//! Basket arithmetic on final prices

use rust_decimal::Decimal;
use shared::error::ErrorCode;
use shared::models::Product;

use super::final_price;
use crate::error::{CoreError, CoreResult};

/// One product line in a basket
#[derive(Debug, Clone)]
pub struct BasketLine {
    pub product: Product,
    pub quantity: i32,
}

impl BasketLine {
    pub fn new(product: Product, quantity: i32) -> Self {
        Self { product, quantity }
    }

    /// `final_price × quantity`
    ///
    /// Fails when the quantity is not positive or exceeds the units in stock.
    pub fn line_total(&self) -> CoreResult<Decimal> {
        if self.quantity <= 0 {
            return Err(CoreError::invalid(
                ErrorCode::InvalidRequest,
                format!("quantity must be positive, got {}", self.quantity),
            ));
        }
        if self.quantity > self.product.quantity {
            return Err(CoreError::invalid(
                ErrorCode::ProductOutOfStock,
                format!(
                    "only {} units of {} in stock",
                    self.product.quantity, self.product.id
                ),
            ));
        }
        Ok(final_price(&self.product) * Decimal::from(self.quantity))
    }
}

/// Sum of all line totals; the first invalid line fails the whole basket
pub fn basket_total(lines: &[BasketLine]) -> CoreResult<Decimal> {
    lines
        .iter()
        .try_fold(Decimal::ZERO, |acc, line| Ok(acc + line.line_total()?))
}
