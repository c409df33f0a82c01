//! Catalog search
//!
//! A query substring is expanded into candidate category and product names
//! through the suggestion sets. Each name is then looked up in the catalog
//! store concurrently; product buckets are merged, filtered and ranked.

use shared::models::{Category, Product, SearchQuery, SearchResults};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::fanout::{FailurePolicy, MAX_FANOUT, fan_out, request_permits};
use super::rank::{merge_buckets, rank};
use super::suggestions::SuggestionService;
use crate::context::RequestContext;
use crate::db::CatalogStore;
use crate::error::CoreResult;

#[derive(Clone)]
pub struct SearchService {
    store: Arc<dyn CatalogStore>,
    suggestions: SuggestionService,
    max_fanout: usize,
}

impl SearchService {
    pub fn new(store: Arc<dyn CatalogStore>, suggestions: SuggestionService) -> Self {
        Self {
            store,
            suggestions,
            max_fanout: MAX_FANOUT,
        }
    }

    pub fn with_max_fanout(mut self, max_fanout: usize) -> Self {
        self.max_fanout = max_fanout.max(1);
        self
    }

    /// Search categories and products matching `query`
    ///
    /// All-or-nothing: any store error or cancellation fails the whole call
    /// and no partial results are returned.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        query: &SearchQuery,
        cancel: &CancellationToken,
    ) -> CoreResult<SearchResults> {
        query.validate()?;

        let span = tracing::info_span!(
            "search",
            request_id = %ctx.request_id,
            substring = %query.substring,
            sort = %query.sort,
        );

        async {
            let scope = cancel.child_token();
            let results = ctx.guard(&scope, self.run(query, &scope)).await;
            match &results {
                Ok(found) => tracing::debug!(
                    categories = found.categories.len(),
                    products = found.products.len(),
                    "Search completed"
                ),
                Err(e) => tracing::debug!(error = %e, "Search failed"),
            }
            results
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        query: &SearchQuery,
        scope: &CancellationToken,
    ) -> CoreResult<SearchResults> {
        let (category_names, product_names) = tokio::join!(
            self.suggestions.category_suggestions(&query.substring),
            self.suggestions.product_suggestions(&query.substring),
        );
        tracing::debug!(
            category_names = category_names.len(),
            product_names = product_names.len(),
            "Suggestions resolved"
        );

        // A failing worker cancels `work` only; `scope` belongs to the guard
        let work = scope.child_token();
        // Both lookups draw from one pool so the request stays within max_fanout
        let permits = request_permits(self.max_fanout);
        let (categories, buckets) = tokio::join!(
            self.lookup_categories(category_names, &permits, &work),
            self.lookup_products(product_names, query, &permits, &work),
        );
        let (categories, buckets) = match (categories, buckets) {
            (Ok(c), Ok(b)) => (c, b),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
            (Err(a), Err(b)) => return Err(if a.is_cancelled() { b } else { a }),
        };

        let mut categories: Vec<Category> = categories.into_iter().flatten().flatten().collect();
        if let Some(category_id) = query.category_id {
            categories.retain(|c| c.id == category_id);
        }

        let mut products = merge_buckets(buckets.into_iter().flatten());
        rank(&mut products, query.sort);

        Ok(SearchResults {
            categories,
            products,
        })
    }

    async fn lookup_categories(
        &self,
        names: Vec<String>,
        permits: &Arc<Semaphore>,
        work: &CancellationToken,
    ) -> CoreResult<Vec<Option<Option<Category>>>> {
        let store = Arc::clone(&self.store);
        fan_out(
            names,
            permits,
            FailurePolicy::FailFast,
            work,
            move |name: String| {
                let store = Arc::clone(&store);
                async move { store.category_by_name(&name).await }
            },
        )
        .await
    }

    async fn lookup_products(
        &self,
        names: Vec<String>,
        query: &SearchQuery,
        permits: &Arc<Semaphore>,
        work: &CancellationToken,
    ) -> CoreResult<Vec<Option<Vec<Product>>>> {
        let store = Arc::clone(&self.store);
        let query = Arc::new(query.clone());
        fan_out(
            names,
            permits,
            FailurePolicy::FailFast,
            work,
            move |name: String| {
                let store = Arc::clone(&store);
                let query = Arc::clone(&query);
                async move { store.products_by_name(&name, &query).await }
            },
        )
        .await
    }
}

