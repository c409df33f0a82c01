mod common;

use bazaar_server::RequestContext;
use bazaar_server::error::CoreError;
use bazaar_server::services::{RecommendationService, parse_seed};
use common::{FakeStore, id, product};
use shared::models::ProductStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const SEED: u128 = 1000;
const X: i64 = 1;
const Y: i64 = 2;
const Z: i64 = 3;

/// Store where every id in `1..=40` plus the seed is an approved product
fn catalog() -> FakeStore {
    let mut products: Vec<_> = (1..=40)
        .map(|n| product(n, &format!("Item {n}"), 10, None))
        .collect();
    products.push(product(SEED, "Seed", 10, None));
    FakeStore::new().with_products(products)
}

async fn recommend(store: FakeStore) -> Result<Vec<uuid::Uuid>, CoreError> {
    RecommendationService::new(Arc::new(store))
        .recommend(&RequestContext::new(), id(SEED), &CancellationToken::new())
        .await
        .map(|products| products.into_iter().map(|p| p.id).collect())
}

#[tokio::test]
async fn test_first_seen_dedup_and_seed_exclusion() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y]);
    store.samples.insert(X, vec![id(1), id(2), id(SEED)]);
    store.samples.insert(Y, vec![id(2), id(3)]);

    assert_eq!(recommend(store).await.unwrap(), vec![id(1), id(2), id(3)]);
}

#[tokio::test]
async fn test_result_is_capped_at_ten() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y]);
    store.samples.insert(X, (1..=10).map(id).collect());
    store.samples.insert(Y, (11..=20).map(id).collect());

    let result = recommend(store).await.unwrap();
    assert_eq!(result, (1..=10).map(id).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_seed_within_first_ten_leaves_nine() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y]);
    let mut first: Vec<_> = (1..=9).map(id).collect();
    first.insert(4, id(SEED));
    store.samples.insert(X, first);
    store.samples.insert(Y, (11..=20).map(id).collect());

    let result = recommend(store).await.unwrap();
    assert_eq!(result.len(), 9);
    assert!(!result.contains(&id(SEED)));
}

#[tokio::test]
async fn test_no_memberships_returns_empty() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![]);
    assert!(recommend(store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_seed_alone_in_subcategory_skips_bulk_load() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X]);
    store.samples.insert(X, vec![id(SEED)]);
    let store = Arc::new(store);

    let result = RecommendationService::new(store.clone())
        .recommend(&RequestContext::new(), id(SEED), &CancellationToken::new())
        .await
        .unwrap();
    assert!(result.is_empty());
    assert!(store.loaded.lock().is_empty());
}

#[tokio::test]
async fn test_unknown_seed_is_not_found() {
    let result = recommend(catalog()).await;
    assert!(matches!(result, Err(CoreError::NotFound(_))));
}

#[tokio::test]
async fn test_subcategory_lookup_failure_surfaces() {
    let mut store = catalog();
    store.fail_subcategory_lookup = true;
    assert!(matches!(
        recommend(store).await,
        Err(CoreError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn test_failing_subcategory_is_skipped() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y, Z]);
    store.samples.insert(X, vec![id(1)]);
    store.samples.insert(Y, vec![id(2)]);
    store.samples.insert(Z, vec![id(3)]);
    store.failing_subcategories.insert(Y);

    assert_eq!(recommend(store).await.unwrap(), vec![id(1), id(3)]);
}

#[tokio::test]
async fn test_every_subcategory_failing_returns_empty() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y]);
    store.failing_subcategories.extend([X, Y]);
    assert!(recommend(store).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_load_failure_surfaces() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X]);
    store.samples.insert(X, vec![id(1)]);
    store.fail_load = true;
    assert!(matches!(
        recommend(store).await,
        Err(CoreError::BackendUnavailable(_))
    ));
}

#[tokio::test]
async fn test_unapproved_candidates_are_dropped() {
    let mut store = catalog();
    store.products[1].status = ProductStatus::Rejected; // id 2
    store.subcategories.insert(id(SEED), vec![X]);
    store.samples.insert(X, vec![id(1), id(2), id(3)]);

    assert_eq!(recommend(store).await.unwrap(), vec![id(1), id(3)]);
}

#[tokio::test]
async fn test_caller_cancellation_mid_fan_out() {
    let mut store = catalog();
    store.subcategories.insert(id(SEED), vec![X, Y, Z]);
    store.samples.insert(X, vec![id(1)]);
    store.samples.insert(Y, vec![id(2)]);
    store.samples.insert(Z, vec![id(3)]);
    store.sample_latency.insert(Z, Duration::from_secs(5));

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let result = RecommendationService::new(Arc::new(store))
        .recommend(&RequestContext::new(), id(SEED), &cancel)
        .await;

    assert!(matches!(result, Err(CoreError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[test]
fn test_seed_parsing() {
    let seed = id(SEED);
    assert_eq!(parse_seed(&seed.to_string()).unwrap(), seed);
    assert!(matches!(parse_seed("42"), Err(CoreError::InvalidArgument { .. })));
}
