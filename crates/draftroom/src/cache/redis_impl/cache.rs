//! Draft cache on a shared Redis server.

use std::time::Duration;

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use draftroom_core::cache::{Cache, Result};

use super::error::map_redis_error;

/// Namespace prepended to every key unless overridden.
pub const DEFAULT_KEY_PREFIX: &str = "draftroom:";

/// Redis-backed [`Cache`].
///
/// Keys are stored as `{prefix}{key}`, e.g. `draftroom:draft:7`, so several
/// deployments can share one Redis database. TTLs are rounded up to whole
/// seconds.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    prefix: String,
}

impl RedisCache {
    /// Connects to `url` (e.g. `redis://localhost:6379`).
    ///
    /// # Errors
    ///
    /// `CacheError::ConnectionFailed` if the server cannot be reached.
    pub async fn new(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let manager = ConnectionManager::new(client)
            .await
            .map_err(map_redis_error)?;

        tracing::debug!(prefix = DEFAULT_KEY_PREFIX, "Connected to Redis cache");
        Ok(Self {
            manager,
            prefix: DEFAULT_KEY_PREFIX.to_string(),
        })
    }

    /// Replaces the key namespace.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

/// Whole seconds for `SET EX`; Redis rejects 0.
fn ttl_seconds(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs.max(1)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut manager = self.manager.clone();
        manager
            .get(self.namespaced(key))
            .await
            .map_err(map_redis_error)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut manager = self.manager.clone();
        let key = self.namespaced(key);

        let outcome: redis::RedisResult<()> = match ttl {
            Some(ttl) => manager.set_ex(key, value, ttl_seconds(ttl)).await,
            None => manager.set(key, value).await,
        };
        outcome.map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut manager = self.manager.clone();
        manager
            .del::<_, ()>(self.namespaced(key))
            .await
            .map_err(map_redis_error)
    }
}
