//! In-memory catalog store and cache fakes with controllable latency and
//! failures

#![allow(dead_code)]

use async_trait::async_trait;
use bazaar_server::cache::{MemorySuggestionCache, SuggestionCache, SuggestionKey};
use bazaar_server::db::{CatalogStore, SubcategoryId};
use bazaar_server::error::{CoreError, CoreResult};
use bazaar_server::pricing::final_price;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::models::{Category, Product, ProductStatus, SearchQuery};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

/// Approved product priced in whole units
pub fn product(n: u128, name: &str, price: i64, discount: Option<i64>) -> Product {
    Product {
        id: id(n),
        name: name.to_string(),
        description: String::new(),
        preview_image_url: None,
        price: Decimal::from(price),
        discount_price: discount.map(Decimal::from),
        quantity: 10,
        rating: 4.0,
        reviews_count: 0,
        status: ProductStatus::Approved,
        seller_id: Uuid::nil(),
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub subcategories: HashMap<Uuid, Vec<SubcategoryId>>,
    pub samples: HashMap<SubcategoryId, Vec<Uuid>>,
    pub latency: Duration,
    /// Per-subcategory sampling delay, on top of `latency`
    pub sample_latency: HashMap<SubcategoryId, Duration>,
    /// Per-name product lookup delay, on top of `latency`
    pub name_latency: HashMap<String, Duration>,
    pub failing_names: HashSet<String>,
    pub failing_categories: HashSet<String>,
    pub failing_subcategories: HashSet<SubcategoryId>,
    pub fail_subcategory_lookup: bool,
    pub fail_load: bool,
    pub page_size: usize,
    pub calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub peak: AtomicUsize,
    pub loaded: Mutex<Vec<Vec<Uuid>>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            page_size: 20,
            ..Self::default()
        }
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_categories(mut self, categories: &[(i64, &str)]) -> Self {
        self.categories = categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most store calls ever in flight at once
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogStore for FakeStore {
    async fn products_by_name(&self, name: &str, query: &SearchQuery) -> CoreResult<Vec<Product>> {
        self.enter().await;
        if let Some(delay) = self.name_latency.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_names.contains(name) {
            return Err(CoreError::BackendUnavailable(format!("lookup of {name} failed")));
        }
        let needle = name.to_lowercase();
        // Status is left unfiltered so the core's own approved gate is exercised
        Ok(self
            .products
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .filter(|p| {
                let price = final_price(p);
                price >= query.min_price && price <= query.max_price
            })
            .filter(|p| p.rating >= query.min_rating)
            .skip(query.offset as usize)
            .take(self.page_size)
            .cloned()
            .collect())
    }

    async fn category_by_name(&self, name: &str) -> CoreResult<Option<Category>> {
        self.enter().await;
        if self.failing_categories.contains(name) {
            return Err(CoreError::BackendUnavailable(format!("category {name} failed")));
        }
        Ok(self.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn subcategories_of(&self, product_id: Uuid) -> CoreResult<Vec<SubcategoryId>> {
        self.enter().await;
        if self.fail_subcategory_lookup {
            return Err(CoreError::BackendUnavailable("subcategory lookup failed".into()));
        }
        self.subcategories
            .get(&product_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("product {product_id}")))
    }

    async fn sample_products_in(
        &self,
        subcategory_id: SubcategoryId,
        limit: u32,
    ) -> CoreResult<Vec<Uuid>> {
        self.enter().await;
        if let Some(delay) = self.sample_latency.get(&subcategory_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_subcategories.contains(&subcategory_id) {
            return Err(CoreError::BackendUnavailable(format!(
                "sampling subcategory {subcategory_id} failed"
            )));
        }
        Ok(self
            .samples
            .get(&subcategory_id)
            .map(|ids| ids.iter().take(limit as usize).copied().collect())
            .unwrap_or_default())
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> CoreResult<Vec<Product>> {
        self.enter().await;
        if self.fail_load {
            return Err(CoreError::BackendUnavailable("bulk load failed".into()));
        }
        self.loaded.lock().push(ids.to_vec());
        Ok(ids
            .iter()
            .filter_map(|id| self.products.iter().find(|p| p.id == *id).cloned())
            .collect())
    }

    async fn approved_product_names(&self) -> CoreResult<Vec<String>> {
        self.enter().await;
        Ok(self
            .products
            .iter()
            .filter(|p| p.is_approved())
            .map(|p| p.name.clone())
            .collect())
    }

    async fn category_names(&self) -> CoreResult<Vec<String>> {
        self.enter().await;
        Ok(self.categories.iter().map(|c| c.name.clone()).collect())
    }
}

/// Memory cache that can fail reads or writes per key
#[derive(Default)]
pub struct FlakyCache {
    pub inner: MemorySuggestionCache,
    pub failing: Mutex<HashSet<SuggestionKey>>,
    pub failing_writes: Mutex<HashSet<SuggestionKey>>,
}

impl FlakyCache {
    pub fn fail(&self, key: SuggestionKey) {
        self.failing.lock().insert(key);
    }

    pub fn fail_writes(&self, key: SuggestionKey) {
        self.failing_writes.lock().insert(key);
    }
}

#[async_trait]
impl SuggestionCache for FlakyCache {
    async fn replace(&self, key: SuggestionKey, values: &BTreeSet<String>) -> CoreResult<()> {
        if self.failing_writes.lock().contains(&key) {
            return Err(CoreError::CacheUnavailable("write rejected".into()));
        }
        self.inner.replace(key, values).await
    }

    async fn members(&self, key: SuggestionKey) -> CoreResult<BTreeSet<String>> {
        if self.failing.lock().contains(&key) {
            return Err(CoreError::CacheUnavailable("connection refused".into()));
        }
        self.inner.members(key).await
    }

    async fn ping(&self) -> CoreResult<()> {
        Ok(())
    }
}

/// Cache pre-filled with the given names
pub async fn seeded_cache(categories: &[&str], products: &[&str]) -> Arc<FlakyCache> {
    let cache = Arc::new(FlakyCache::default());
    let to_set = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>();
    cache
        .replace(SuggestionKey::Categories, &to_set(categories))
        .await
        .expect("memory cache replace");
    cache
        .replace(SuggestionKey::Products, &to_set(products))
        .await
        .expect("memory cache replace");
    cache
}
