//! Redis-backed store
//!
//! Wraps a `fred` connection pool. Values are written with plain `SET`
//! (no expiry); cache entries live until the keyspace is flushed.

use async_trait::async_trait;
use fred::clients::Pool;
use fred::interfaces::{ClientLike, KeysInterface};
use fred::types::Builder;
use fred::types::config::{Config as FredConfig, ReconnectPolicy};

use crate::error::{Result, StoreError};
use crate::{KeyValueStore, non_empty};

/// Connections kept open per store
const POOL_SIZE: usize = 4;

/// Redis key-value store
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Connect to `url` (`redis://host:port[/db]`) and verify with a PING
    pub async fn connect(url: &str) -> Result<Self> {
        let config = FredConfig::from_url(url).map_err(|e| StoreError::InvalidConfig {
            message: format!("invalid redis URL '{}': {}", url, e),
        })?;

        let mut builder = Builder::from_config(config);
        builder.set_policy(ReconnectPolicy::new_exponential(0, 100, 30_000, 2));

        let pool = builder.build_pool(POOL_SIZE)?;
        pool.init().await?;

        let _: String = pool.ping(None).await?;

        tracing::info!(url = url, pool_size = POOL_SIZE, "Redis pool created and verified");

        Ok(Self { pool })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = self
            .pool
            .get(key)
            .await
            .map_err(|e| StoreError::command(key, e))?;
        Ok(non_empty(value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _: () = self
            .pool
            .set(key, value, None, None, false)
            .await
            .map_err(|e| StoreError::command(key, e))?;
        Ok(())
    }
}
