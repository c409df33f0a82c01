//! Merge and ordering of search results

use shared::models::{Product, SortOrder};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::pricing::final_price;

/// Concatenate per-name buckets in order, keeping the first copy of each
/// product and dropping anything not approved
pub fn merge_buckets(buckets: impl IntoIterator<Item = Vec<Product>>) -> Vec<Product> {
    let mut seen = HashSet::new();
    buckets
        .into_iter()
        .flatten()
        .filter(|p| p.is_approved() && seen.insert(p.id))
        .collect()
}

/// Sort in place; ties fall back to product id ascending
///
/// [`SortOrder::None`] keeps the existing order.
pub fn rank(products: &mut [Product], sort: SortOrder) {
    let primary: fn(&Product, &Product) -> Ordering = match sort {
        SortOrder::PriceAsc => |a, b| final_price(a).cmp(&final_price(b)),
        SortOrder::PriceDesc => |a, b| final_price(b).cmp(&final_price(a)),
        SortOrder::RatingAsc => |a, b| a.rating.total_cmp(&b.rating),
        SortOrder::RatingDesc => |a, b| b.rating.total_cmp(&a.rating),
        SortOrder::None => return,
    };
    products.sort_by(|a, b| primary(a, b).then_with(|| a.id.cmp(&b.id)));
}
