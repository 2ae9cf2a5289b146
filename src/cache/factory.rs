// ABOUTME: Cache facade for configuration-based backend selection
// ABOUTME: Falls back to the in-memory backend when Redis is unreachable
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{memory::InMemoryCache, redis::RedisCache, CacheConfig, CacheProvider, EventLog};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unified cache interface over the configured backend
///
/// `REDIS_URL` selects the Redis backend; anything else (or a Redis that
/// cannot be reached at startup) lands on the in-memory backend.
#[derive(Clone)]
pub enum Cache {
    /// In-process LRU cache
    Memory(InMemoryCache),
    /// Distributed Redis cache
    Redis(RedisCache),
}

impl Cache {
    /// Create new cache instance based on configuration
    ///
    /// A configured but unreachable Redis degrades to the in-memory backend
    /// with a warning instead of failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory cache fails to initialize
    pub async fn from_config(config: CacheConfig) -> AppResult<Self> {
        if config.redis_url.is_some() {
            match RedisCache::new(config.clone()).await {
                Ok(redis) => return Ok(Self::Redis(redis)),
                Err(e) => {
                    tracing::warn!(
                        "Could not connect to Redis, falling back to in-memory cache: {e}"
                    );
                }
            }
        }

        tracing::info!(
            "Initializing in-memory cache (max entries: {})",
            config.max_entries
        );
        let inner = InMemoryCache::new(config).await?;
        Ok(Self::Memory(inner))
    }

    /// Backend name for logging and diagnostics
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }

    /// The counting-store extension, when the backend supports it natively
    #[must_use]
    pub fn event_log(&self) -> Option<&dyn EventLog> {
        match self {
            Self::Memory(_) => None,
            Self::Redis(redis) => Some(redis),
        }
    }

    /// Store value under key; `ttl` of `None` means no expiry
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    pub async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.set(key, value, ttl).await,
            Self::Redis(inner) => inner.set(key, value, ttl).await,
        }
    }

    /// Retrieve value from cache; expired entries read as absent
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub async fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> AppResult<Option<T>> {
        match self {
            Self::Memory(inner) => inner.get(key).await,
            Self::Redis(inner) => inner.get(key).await,
        }
    }

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    pub async fn invalidate(&self, key: &str) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.invalidate(key).await,
            Self::Redis(inner) => inner.invalidate(key).await,
        }
    }

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL check fails
    pub async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        match self {
            Self::Memory(inner) => inner.ttl(key).await,
            Self::Redis(inner) => inner.ttl(key).await,
        }
    }

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails
    pub async fn health_check(&self) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.health_check().await,
            Self::Redis(inner) => inner.health_check().await,
        }
    }

    /// Clear all cache entries
    ///
    /// # Errors
    ///
    /// Returns an error if the clear operation fails
    pub async fn clear_all(&self) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.clear_all().await,
            Self::Redis(inner) => inner.clear_all().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_has_no_event_log() {
        let config = CacheConfig {
            enable_background_cleanup: false,
            ..CacheConfig::default()
        };
        let cache = Cache::from_config(config).await.unwrap();
        assert_eq!(cache.backend_name(), "memory");
        assert!(cache.event_log().is_none());
    }
}
