//! Application state for bazaar-server

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::{MemorySuggestionCache, RedisSuggestionCache, SuggestionCache};
use crate::config::Config;
use crate::db::{self, CatalogStore, PgCatalogStore};
use crate::services::{RecommendationService, SearchService, SuggestionRefresher, SuggestionService};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: Option<PgPool>,
    pub store: Arc<dyn CatalogStore>,
    pub cache: Arc<dyn SuggestionCache>,
    pub search: SearchService,
    pub recommendations: RecommendationService,
    pub config: Config,
}

impl AppState {
    /// Connect the catalog pool and suggestion cache, then wire the services
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = db::connect(config).await?;
        let store: Arc<dyn CatalogStore> = Arc::new(
            PgCatalogStore::new(pool.clone()).with_page_size(config.store_page_size),
        );

        let cache: Arc<dyn SuggestionCache> = match &config.redis_url {
            Some(url) => Arc::new(RedisSuggestionCache::connect(url).await?),
            None => {
                tracing::info!("REDIS_URL not set, keeping suggestion sets in process");
                Arc::new(MemorySuggestionCache::new())
            }
        };
        cache.ping().await?;

        let mut state = Self::from_parts(store, cache, config.clone());
        state.pool = Some(pool);
        Ok(state)
    }

    /// Wire services over an existing store and cache
    pub fn from_parts(
        store: Arc<dyn CatalogStore>,
        cache: Arc<dyn SuggestionCache>,
        config: Config,
    ) -> Self {
        let suggestions = SuggestionService::new(Arc::clone(&cache));
        let search = SearchService::new(Arc::clone(&store), suggestions)
            .with_max_fanout(config.max_fanout);
        let recommendations = RecommendationService::new(Arc::clone(&store))
            .with_limits(
                config.recommendation_limit,
                config.recommendation_per_subcategory,
            )
            .with_max_fanout(config.max_fanout);

        Self {
            pool: None,
            store,
            cache,
            search,
            recommendations,
            config,
        }
    }

    pub fn refresher(&self) -> SuggestionRefresher {
        SuggestionRefresher::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.config.suggestion_refresh_interval,
        )
    }

    pub fn uses_memory_cache(&self) -> bool {
        self.config.redis_url.is_none()
    }
}
