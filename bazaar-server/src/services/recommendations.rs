//! "More like this" recommendations
//!
//! Products sharing a subcategory with the seed. Each subcategory is sampled
//! concurrently; a failing subcategory only shrinks the candidate pool.

use shared::error::ErrorCode;
use shared::models::Product;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use super::fanout::{FailurePolicy, MAX_FANOUT, fan_out, request_permits};
use crate::context::RequestContext;
use crate::db::CatalogStore;
use crate::error::{CoreError, CoreResult};

/// Maximum number of recommendations (K)
pub const DEFAULT_LIMIT: usize = 10;
/// Ids sampled from each subcategory
pub const DEFAULT_PER_SUBCATEGORY: u32 = 10;

/// Parse a seed product id
pub fn parse_seed(raw: &str) -> CoreResult<Uuid> {
    Uuid::from_str(raw.trim()).map_err(|e| {
        CoreError::invalid(
            ErrorCode::InvalidRequest,
            format!("invalid product id {raw:?}: {e}"),
        )
    })
}

/// Candidate ids from per-subcategory samples
///
/// First-seen order across subcategories, de-duplicated, cut to `limit`,
/// then the seed removed. The seed is dropped after the cut, so a sample
/// containing it yields at most `limit - 1` ids.
pub fn select_candidates(
    samples: impl IntoIterator<Item = Vec<Uuid>>,
    seed: Uuid,
    limit: usize,
) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    let mut picked: Vec<Uuid> = samples
        .into_iter()
        .flatten()
        .filter(|id| seen.insert(*id))
        .take(limit)
        .collect();
    picked.retain(|id| *id != seed);
    picked
}

#[derive(Clone)]
pub struct RecommendationService {
    store: Arc<dyn CatalogStore>,
    limit: usize,
    per_subcategory: u32,
    max_fanout: usize,
}

impl RecommendationService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            limit: DEFAULT_LIMIT,
            per_subcategory: DEFAULT_PER_SUBCATEGORY,
            max_fanout: MAX_FANOUT,
        }
    }

    pub fn with_limits(mut self, limit: usize, per_subcategory: u32) -> Self {
        self.limit = limit;
        self.per_subcategory = per_subcategory;
        self
    }

    pub fn with_max_fanout(mut self, max_fanout: usize) -> Self {
        self.max_fanout = max_fanout.max(1);
        self
    }

    /// Up to `limit` approved products related to `seed`, never the seed
    pub async fn recommend(
        &self,
        ctx: &RequestContext,
        seed: Uuid,
        cancel: &CancellationToken,
    ) -> CoreResult<Vec<Product>> {
        let span = tracing::info_span!(
            "recommend",
            request_id = %ctx.request_id,
            seed = %seed,
        );

        async {
            let scope = cancel.child_token();
            let result = ctx.guard(&scope, self.run(seed, &scope)).await;
            match &result {
                Ok(products) => tracing::debug!(count = products.len(), "Recommendations ready"),
                Err(e) => tracing::debug!(error = %e, "Recommendations failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, seed: Uuid, scope: &CancellationToken) -> CoreResult<Vec<Product>> {
        let subcategories = self.store.subcategories_of(seed).await?;
        if subcategories.is_empty() {
            return Ok(Vec::new());
        }

        let store = Arc::clone(&self.store);
        let per_subcategory = self.per_subcategory;
        let samples = fan_out(
            subcategories,
            &request_permits(self.max_fanout),
            FailurePolicy::BestEffort,
            scope,
            move |subcategory| {
                let store = Arc::clone(&store);
                async move { store.sample_products_in(subcategory, per_subcategory).await }
            },
        )
        .await?;

        let candidates = select_candidates(samples.into_iter().flatten(), seed, self.limit);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let products = self.store.products_by_ids(&candidates).await?;
        Ok(products.into_iter().filter(Product::is_approved).collect())
    }
}
