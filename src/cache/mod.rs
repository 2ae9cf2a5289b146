// ABOUTME: Cache abstraction layer with pluggable backends and optional TTLs
// ABOUTME: Adds a counting-store extension used by the sliding-window rate limiter
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Cache abstraction shared by the lookup result cache and the rate limiter.
//!
//! Two backends satisfy the [`CacheProvider`] contract: an in-process LRU map
//! and Redis. Redis additionally implements [`EventLog`], the counting-store
//! extension the rate limiter prefers; a backend without it is still usable
//! through the limiter's get/set fallback path.

/// Cache facade selecting the configured backend
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Redis cache implementation
pub mod redis;

pub use factory::Cache;

use crate::config::environment::RedisConnectionConfig;
use crate::constants::cache::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache provider trait for pluggable backend implementations
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value under key; `ttl` of `None` means no expiry
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> AppResult<()>;

    /// Retrieve value from cache; expired entries read as absent
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &str) -> AppResult<()>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if the TTL check fails
    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>>;

    /// Verify cache backend is healthy
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails
    async fn health_check(&self) -> AppResult<()>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if the clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Counting-store extension for backends that can maintain per-key event logs
/// natively. Scores are unix-second timestamps.
#[async_trait::async_trait]
pub trait EventLog: Send + Sync {
    /// Record one event at `timestamp` under `key`
    async fn add_event(&self, key: &str, timestamp: i64) -> AppResult<()>;

    /// Drop events strictly older than `cutoff`
    async fn remove_events_older_than(&self, key: &str, cutoff: i64) -> AppResult<()>;

    /// Count events currently recorded under `key`
    async fn count_events(&self, key: &str) -> AppResult<u64>;

    /// Bound the lifetime of the whole event log for `key`
    async fn set_expiry(&self, key: &str, ttl_secs: u64) -> AppResult<()>;
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries (for the in-memory cache)
    pub max_entries: usize,
    /// Redis connection URL (selects the Redis backend when set)
    pub redis_url: Option<String>,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Redis connection and retry configuration
    pub redis_connection: RedisConnectionConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            redis_url: None,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            redis_connection: RedisConnectionConfig::default(),
        }
    }
}
