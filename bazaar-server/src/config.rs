//! Server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Catalog core configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// Max connections in the catalog pool
    pub database_max_connections: u32,
    /// Redis URL for the suggestion cache; `None` keeps suggestions in process
    pub redis_url: Option<String>,
    /// Environment: development | staging | production
    pub environment: String,
    /// Default log level when RUST_LOG is unset
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Directory for daily rolling log files
    pub log_dir: Option<String>,
    /// How often the suggestion sets are rebuilt from the catalog
    pub suggestion_refresh_interval: Duration,
    /// Upper bound on concurrent store calls per request
    pub max_fanout: usize,
    /// Rows returned by one GetProductsByName call
    pub store_page_size: i64,
    /// Recommendation result bound (K)
    pub recommendation_limit: usize,
    /// Ids sampled from each subcategory
    pub recommendation_per_subcategory: u32,
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_or("LOG_JSON", false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            suggestion_refresh_interval: Duration::from_secs(env_or(
                "SUGGESTION_REFRESH_SECS",
                300,
            )),
            max_fanout: env_or("MAX_FANOUT", crate::services::fanout::MAX_FANOUT),
            store_page_size: env_or("STORE_PAGE_SIZE", crate::db::DEFAULT_PAGE_SIZE),
            recommendation_limit: env_or(
                "RECOMMENDATION_LIMIT",
                crate::services::recommendations::DEFAULT_LIMIT,
            ),
            recommendation_per_subcategory: env_or(
                "RECOMMENDATION_PER_SUBCATEGORY",
                crate::services::recommendations::DEFAULT_PER_SUBCATEGORY,
            ),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), BoxError> {
        if self.max_fanout == 0 {
            return Err("MAX_FANOUT must be at least 1".into());
        }
        if self.store_page_size <= 0 {
            return Err("STORE_PAGE_SIZE must be positive".into());
        }
        if self.suggestion_refresh_interval.is_zero() {
            return Err("SUGGESTION_REFRESH_SECS must be positive".into());
        }
        if self.recommendation_limit == 0 {
            return Err("RECOMMENDATION_LIMIT must be at least 1".into());
        }
        if self.recommendation_per_subcategory == 0 {
            return Err("RECOMMENDATION_PER_SUBCATEGORY must be at least 1".into());
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
