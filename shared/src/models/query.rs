//! Search query and result types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use super::{Category, Product};

/// Highest rating a product can have
pub const MAX_RATING: f64 = 5.0;

/// Ordering applied to search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
    /// Keep the order results were merged in
    #[default]
    None,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::RatingAsc => "rating_asc",
            Self::RatingDesc => "rating_desc",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    /// Parse the wire name; an empty string means [`SortOrder::None`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "rating_asc" => Ok(Self::RatingAsc),
            "rating_desc" => Ok(Self::RatingDesc),
            "none" | "" => Ok(Self::None),
            other => Err(QueryError::UnknownSort(other.to_string())),
        }
    }
}

/// Reasons a search query is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("unknown sort order: {0}")]
    UnknownSort(String),

    #[error("min_price {min} exceeds max_price {max}")]
    PriceRange { min: Decimal, max: Decimal },

    #[error("price bound must not be negative: {0}")]
    NegativePrice(Decimal),

    #[error("min_rating must be within 0..=5, got {0}")]
    RatingOutOfRange(f64),

    #[error("offset must not be negative, got {0}")]
    NegativeOffset(i64),
}

/// Product search request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text matched against suggestion names
    #[serde(default)]
    pub substring: String,
    /// Restricts the category part of the result to this category
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub min_price: Decimal,
    #[serde(default = "default_max_price")]
    pub max_price: Decimal,
    #[serde(default)]
    pub min_rating: f64,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default)]
    pub offset: i64,
}

fn default_max_price() -> Decimal {
    Decimal::MAX
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            substring: String::new(),
            category_id: None,
            min_price: Decimal::ZERO,
            max_price: default_max_price(),
            min_rating: 0.0,
            sort: SortOrder::None,
            offset: 0,
        }
    }
}

impl SearchQuery {
    pub fn new(substring: impl Into<String>) -> Self {
        Self {
            substring: substring.into(),
            ..Self::default()
        }
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Check the query constraints
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.min_price.is_sign_negative() {
            return Err(QueryError::NegativePrice(self.min_price));
        }
        if self.max_price.is_sign_negative() {
            return Err(QueryError::NegativePrice(self.max_price));
        }
        if self.min_price > self.max_price {
            return Err(QueryError::PriceRange {
                min: self.min_price,
                max: self.max_price,
            });
        }
        // NaN fails both comparisons
        if !(0.0..=MAX_RATING).contains(&self.min_rating) {
            return Err(QueryError::RatingOutOfRange(self.min_rating));
        }
        if self.offset < 0 {
            return Err(QueryError::NegativeOffset(self.offset));
        }
        Ok(())
    }
}

/// Search response: matched categories and ranked products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.products.is_empty()
    }
}
