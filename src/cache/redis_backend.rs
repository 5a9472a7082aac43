//! Redis list cache
//!
//! Stores serialized todo lists in Redis through a deadpool connection pool.
//! The pool connects lazily, so a missing Redis server only shows up when a
//! command is issued.

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;

use super::ListCache;
use crate::error::{AppError, Result};

/// Redis-backed list cache.
#[derive(Clone)]
pub struct RedisListCache {
    pool: Pool,
}

impl RedisListCache {
    /// Creates a cache for the given connection URL.
    pub fn new(connection_url: impl Into<String>) -> Result<Self> {
        let pool = PoolConfig::from_url(connection_url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| AppError::Cache(format!("Failed to create Redis pool: {}", e)))?;
        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<Connection> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn delete(&self, keys: &[&str]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        let _: () = conn.del(keys.to_vec()).await?;
        Ok(())
    }
}
