// ABOUTME: Sliding-window rate limiter keyed per actor, counted against the shared cache
// ABOUTME: Uses the backend's counting store when available, a get/set fallback otherwise
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Sliding-Window Rate Limiting
//!
//! Counts events within the trailing `window_secs` from now, recomputed on
//! every check rather than aligned to fixed calendar buckets. Expired events
//! are purged lazily on read. An attempt is recorded only when it is allowed,
//! on both code paths.
//!
//! Exactness depends on the cache backend: the Redis counting store gives
//! exact limiting under concurrency; the get/set fallback path is a
//! read-modify-write and therefore best-effort under concurrent load.

use crate::cache::{Cache, EventLog};
use crate::constants::cache::RATE_KEY_PREFIX;
use crate::errors::AppResult;
use chrono::Utc;

/// Rate limiter configuration
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per window
    pub max_requests: u32,
    /// Trailing window length in seconds
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: crate::constants::limits::DEFAULT_RATE_LIMIT,
            window_secs: crate::constants::limits::DEFAULT_RATE_LIMIT_WINDOW_SECS,
        }
    }
}

/// Sliding-window rate limiter backed by the shared cache
#[derive(Clone)]
pub struct RateLimiter {
    cache: Cache,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Create a rate limiter over the given cache backend
    #[must_use]
    pub const fn new(cache: Cache, config: RateLimitConfig) -> Self {
        Self { cache, config }
    }

    /// Decide whether the keyed actor may proceed, recording the attempt on
    /// allow
    ///
    /// Unknown keys behave as zero prior events. Rejected attempts are not
    /// recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache backend fails
    pub async fn is_allowed(&self, key: &str) -> AppResult<bool> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)] // Window lengths are small positive values
        let window_start = now - self.config.window_secs as i64;
        let bucket = format!("{RATE_KEY_PREFIX}{key}");

        match self.cache.event_log() {
            Some(log) => self.check_native(log, &bucket, now, window_start).await,
            None => self.check_fallback(&bucket, now, window_start).await,
        }
    }

    /// Native path: the backend maintains the event log itself
    async fn check_native(
        &self,
        log: &dyn EventLog,
        bucket: &str,
        now: i64,
        window_start: i64,
    ) -> AppResult<bool> {
        log.remove_events_older_than(bucket, window_start).await?;
        let current = log.count_events(bucket).await?;

        if current >= u64::from(self.config.max_requests) {
            return Ok(false);
        }

        log.add_event(bucket, now).await?;
        log.set_expiry(bucket, self.config.window_secs + 1).await?;
        Ok(true)
    }

    /// Fallback path: the event list is an ordinary cached value, filtered
    /// locally and written back. Not atomic; concurrent callers on the same
    /// key may each observe the pre-write count.
    async fn check_fallback(&self, bucket: &str, now: i64, window_start: i64) -> AppResult<bool> {
        let mut events: Vec<i64> = self.cache.get(bucket).await?.unwrap_or_default();
        events.retain(|&t| t >= window_start);

        if events.len() >= self.config.max_requests as usize {
            return Ok(false);
        }

        events.push(now);
        self.cache
            .set(
                bucket,
                &events,
                Some(std::time::Duration::from_secs(self.config.window_secs + 1)),
            )
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::memory::InMemoryCache;
    use crate::cache::{CacheConfig, CacheProvider};

    async fn test_limiter(max_requests: u32, window_secs: u64) -> RateLimiter {
        let cache = InMemoryCache::new(CacheConfig {
            enable_background_cleanup: false,
            ..CacheConfig::default()
        })
        .await
        .unwrap();
        RateLimiter::new(
            Cache::Memory(cache),
            RateLimitConfig {
                max_requests,
                window_secs,
            },
        )
    }

    #[tokio::test]
    async fn test_exactly_limit_requests_allowed_within_window() {
        let limiter = test_limiter(3, 60).await;

        for _ in 0..3 {
            assert!(limiter.is_allowed("client-a").await.unwrap());
        }
        assert!(!limiter.is_allowed("client-a").await.unwrap());
        // Still rejected; rejected attempts are not recorded
        assert!(!limiter.is_allowed("client-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let limiter = test_limiter(1, 60).await;

        assert!(limiter.is_allowed("client-a").await.unwrap());
        assert!(!limiter.is_allowed("client-a").await.unwrap());
        // A fresh key has zero prior events
        assert!(limiter.is_allowed("client-b").await.unwrap());
    }

    #[tokio::test]
    async fn test_blocked_key_recovers_after_window() {
        let limiter = test_limiter(2, 1).await;

        assert!(limiter.is_allowed("client-a").await.unwrap());
        assert!(limiter.is_allowed("client-a").await.unwrap());
        assert!(!limiter.is_allowed("client-a").await.unwrap());

        // Past the window every prior event is purged on the next read
        tokio::time::sleep(std::time::Duration::from_millis(2100)).await;
        assert!(limiter.is_allowed("client-a").await.unwrap());
    }
}
