//! bazaar-server: marketplace catalog core
//!
//! Long-running process that:
//! - Owns the catalog store pool and the suggestion cache
//! - Keeps the suggestion sets fresh from the catalog
//! - Serves search and recommendations to the gateway through `AppState`

use bazaar_server::config::Config;
use bazaar_server::logger;
use bazaar_server::state::AppState;
use bazaar_server::tasks::{BackgroundTasks, TaskKind};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logger::init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())?;

    tracing::info!(env = %config.environment, "Starting bazaar-server");

    let state = AppState::new(&config).await?;
    if config.is_production() && state.uses_memory_cache() {
        tracing::warn!("Production without REDIS_URL: suggestion sets are per process");
    }

    let mut tasks = BackgroundTasks::new();

    // Warm the suggestion sets once; the periodic refresher skips its first tick
    let warmup = state.refresher();
    tasks.spawn("suggestion_warmup", TaskKind::Warmup, async move {
        if let Err(e) = warmup.refresh().await {
            tracing::error!(error = %e, code = %e.code(), "Initial suggestion refresh failed");
        }
    });
    tasks.spawn(
        "suggestion_refresher",
        TaskKind::Periodic,
        state.refresher().run(tasks.shutdown_token()),
    );
    tasks.log_summary();

    let mut health = tokio::time::interval(std::time::Duration::from_secs(60));
    health.tick().await;
    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    tracing::error!(error = %e, "Failed to listen for shutdown signal");
                }
                break;
            }
            _ = health.tick() => {
                tasks.check_health();
                if let Err(e) = state.cache.ping().await {
                    tracing::warn!(error = %e, "Suggestion cache ping failed");
                }
            }
        }
    }

    tracing::info!("Shutdown signal received");
    tasks.shutdown().await;
    if let Some(pool) = &state.pool {
        pool.close().await;
    }
    tracing::info!("bazaar-server stopped");
    Ok(())
}
