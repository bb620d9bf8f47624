//! Redis store backend using a deadpool connection pool.

use async_trait::async_trait;
use deadpool_redis::{Config, Pool, Runtime};
use redis::AsyncCommands;

use crate::{
    config::RedisConfig,
    core::{ConfigStore, StoreError, StoreResult},
};

pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    /// Pool creation performs no network I/O; connectivity problems surface
    /// on first use (or via [`ConfigStore::ping`]).
    pub fn new(config: RedisConfig) -> StoreResult<Self> {
        config.validate().map_err(StoreError::Unavailable)?;
        let mut cfg = Config::from_url(config.url);
        cfg.pool = Some(deadpool_redis::PoolConfig::new(config.pool_max));
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }

    async fn conn(&self) -> StoreResult<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl Clone for RedisStore {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait]
impl ConfigStore for RedisStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        let keys: Vec<String> = conn
            .keys(pattern)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(keys)
    }

    async fn ping(&self) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Operation(e.to_string()))?;
        Ok(pong.eq_ignore_ascii_case("pong"))
    }

    async fn close(&self) {
        self.pool.close();
    }
}
