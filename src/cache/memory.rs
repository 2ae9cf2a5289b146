// ABOUTME: In-memory cache implementation with LRU eviction and TTL support
// ABOUTME: Includes background cleanup task for expired entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use super::{CacheConfig, CacheProvider};
use crate::errors::AppResult;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// In-memory cache entry with optional expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|t| Instant::now() + t),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at
            .and_then(|at| at.checked_duration_since(Instant::now()))
    }
}

/// In-memory cache with LRU eviction and background cleanup
///
/// Uses `Arc<RwLock<LruCache>>` for shared state between cache operations and
/// the background cleanup task. `LruCache` bounds memory by evicting the
/// least-recently-used entry on insert; expired entries are also removed
/// lazily on read.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
    shutdown_tx: Option<Arc<tokio::sync::mpsc::Sender<()>>>,
}

impl InMemoryCache {
    /// Fallback capacity when config specifies zero entries
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    fn new_with_config(config: &CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);

        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self { store, shutdown_tx }
    }

    /// Remove all expired entries from cache
    async fn cleanup_expired(store: &Arc<RwLock<LruCache<String, CacheEntry>>>) {
        let mut store_guard = store.write().await;

        // Collect expired keys first (can't modify while iterating)
        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter_map(|(k, v)| v.is_expired().then(|| k.clone()))
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }

        let removed = expired_keys.len();
        drop(store_guard);
        if removed > 0 {
            tracing::debug!("Cleaned up {} expired cache entries", removed);
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for InMemoryCache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        Ok(Self::new_with_config(&config))
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let entry = CacheEntry::new(serialized, ttl);

        // LruCache handles eviction automatically on push
        self.store.write().await.push(key.to_owned(), entry);

        Ok(())
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &str) -> AppResult<Option<T>> {
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order for LRU)
        if let Some(entry) = store.get(key) {
            if entry.is_expired() {
                store.pop(key);
                drop(store);
                return Ok(None);
            }

            let value: T = serde_json::from_slice(&entry.data)?;
            drop(store);
            return Ok(Some(value));
        }
        drop(store);

        Ok(None)
    }

    async fn invalidate(&self, key: &str) -> AppResult<()> {
        self.store.write().await.pop(key);
        Ok(())
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let store = self.store.write().await;

        // Use peek to avoid updating LRU order
        if let Some(entry) = store.peek(key) {
            if entry.is_expired() {
                return Ok(None);
            }
            let ttl = entry.remaining_ttl();
            drop(store);
            return Ok(ttl);
        }

        Ok(None)
    }

    async fn health_check(&self) -> AppResult<()> {
        // In-memory cache is always healthy
        Ok(())
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        // The cleanup task exits when all senders are dropped and recv()
        // returns None; try_send just hurries it along
        if let Some(tx) = &self.shutdown_tx {
            if let Err(e) = tx.try_send(()) {
                tracing::debug!(error = ?e, "Cache shutdown signal send failed (channel likely closed)");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CacheConfig {
        CacheConfig {
            enable_background_cleanup: false,
            ..CacheConfig::default()
        }
    }

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let cache = InMemoryCache::new(test_config()).await.unwrap();
        cache
            .set("k", &"value".to_owned(), Some(Duration::from_secs(60)))
            .await
            .unwrap();
        let got: Option<String> = cache.get("k").await.unwrap();
        assert_eq!(got.as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_as_absent() {
        let cache = InMemoryCache::new(test_config()).await.unwrap();
        cache
            .set("k", &42u32, Some(Duration::from_millis(20)))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        let got: Option<u32> = cache.get("k").await.unwrap();
        assert_eq!(got, None);
    }

    #[tokio::test]
    async fn test_no_ttl_means_no_expiry() {
        let cache = InMemoryCache::new(test_config()).await.unwrap();
        cache.set("k", &1u8, None).await.unwrap();
        assert_eq!(cache.ttl("k").await.unwrap(), None);
        let got: Option<u8> = cache.get("k").await.unwrap();
        assert_eq!(got, Some(1));
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = InMemoryCache::new(test_config()).await.unwrap();
        cache.set("k", &1u8, None).await.unwrap();
        cache.invalidate("k").await.unwrap();
        let got: Option<u8> = cache.get("k").await.unwrap();
        assert_eq!(got, None);
    }
}
