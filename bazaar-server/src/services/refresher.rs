//! Suggestion set refresher
//!
//! Rebuilds both suggestion sets from the catalog on an interval.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::cache::{SuggestionCache, SuggestionKey};
use crate::db::CatalogStore;
use crate::error::CoreResult;

/// Refresh counts from one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSummary {
    pub categories: usize,
    pub products: usize,
}

pub struct SuggestionRefresher {
    store: Arc<dyn CatalogStore>,
    cache: Arc<dyn SuggestionCache>,
    interval: Duration,
}

impl SuggestionRefresher {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<dyn SuggestionCache>,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            interval,
        }
    }

    /// Replace both suggestion sets with the current catalog names
    ///
    /// Both reads finish before either set is written, so a store failure
    /// leaves the cache untouched. The two writes are not atomic together:
    /// when the products write fails the categories set is already new, and
    /// both sets converge again on the next successful pass.
    pub async fn refresh(&self) -> CoreResult<RefreshSummary> {
        let (categories, products) =
            tokio::try_join!(self.store.category_names(), self.store.approved_product_names())?;

        let categories: BTreeSet<String> = categories.into_iter().collect();
        let products: BTreeSet<String> = products.into_iter().collect();

        self.replace(SuggestionKey::Categories, &categories).await?;
        self.replace(SuggestionKey::Products, &products)
            .await
            .inspect_err(|_| {
                tracing::warn!("Categories set already replaced, suggestion sets out of step");
            })?;

        let summary = RefreshSummary {
            categories: categories.len(),
            products: products.len(),
        };
        tracing::info!(
            categories = summary.categories,
            products = summary.products,
            "Suggestion sets refreshed"
        );
        Ok(summary)
    }

    async fn replace(&self, key: SuggestionKey, names: &BTreeSet<String>) -> CoreResult<()> {
        self.cache.replace(key, names).await.inspect_err(|e| {
            tracing::error!(key = key.as_str(), error = %e, "Suggestion set replace failed");
        })
    }

    /// Refresh every interval until `shutdown` fires
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "SuggestionRefresher started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        interval.tick().await; // skip immediate tick

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("SuggestionRefresher shutting down");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.refresh().await {
                        tracing::error!(error = %e, code = %e.code(), "Suggestion refresh failed");
                    }
                }
            }
        }
    }
}
