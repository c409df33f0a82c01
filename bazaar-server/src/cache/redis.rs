//! Redis-backed suggestion sets
//!
//! Each suggestion set is a Redis SET. `replace` runs DEL + SADD in one
//! MULTI/EXEC so readers never observe a half-written set.

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use std::collections::BTreeSet;
use std::time::Duration;

use super::{SuggestionCache, SuggestionKey};
use crate::error::CoreResult;

#[derive(Clone)]
pub struct RedisSuggestionCache {
    connection: ConnectionManager,
}

impl RedisSuggestionCache {
    pub async fn connect(redis_url: &str) -> CoreResult<Self> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(500));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        tracing::info!("Connected to Redis suggestion cache");
        Ok(Self { connection })
    }
}

#[async_trait]
impl SuggestionCache for RedisSuggestionCache {
    async fn replace(&self, key: SuggestionKey, values: &BTreeSet<String>) -> CoreResult<()> {
        let mut conn = self.connection.clone();

        let mut pipe = redis::pipe();
        pipe.atomic().del(key.as_str()).ignore();
        if !values.is_empty() {
            let members: Vec<&str> = values.iter().map(String::as_str).collect();
            pipe.sadd(key.as_str(), members).ignore();
        }
        let () = pipe.query_async(&mut conn).await?;

        tracing::debug!(key = %key, count = values.len(), "Suggestion set replaced");
        Ok(())
    }

    async fn members(&self, key: SuggestionKey) -> CoreResult<BTreeSet<String>> {
        let mut conn = self.connection.clone();
        let members: BTreeSet<String> = conn.smembers(key.as_str()).await?;
        Ok(members)
    }

    async fn ping(&self) -> CoreResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
