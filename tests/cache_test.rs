// ABOUTME: Integration tests for the cache facade
// ABOUTME: Round trips, TTL expiry, and rate limiter interaction through the facade
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::memory_cache;
use mealcal_server::models::CalorieResult;
use mealcal_server::rate_limiting::{RateLimitConfig, RateLimiter};
use std::time::Duration;

#[tokio::test]
async fn test_round_trip_through_facade() {
    let cache = memory_cache().await;

    let result = CalorieResult::new("pasta".into(), 2.0, 200.0, "Pasta, cooked".into());
    let key = CalorieResult::cache_key("pasta", 2.0);

    cache
        .set(&key, &result, Some(Duration::from_secs(60)))
        .await
        .unwrap();

    let cached: Option<CalorieResult> = cache.get(&key).await.unwrap();
    assert_eq!(cached, Some(result));

    let ttl = cache.ttl(&key).await.unwrap();
    assert!(ttl.is_some_and(|t| t <= Duration::from_secs(60)));
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let cache = memory_cache().await;

    cache
        .set("short-lived", &1u32, Some(Duration::from_millis(30)))
        .await
        .unwrap();
    let present: Option<u32> = cache.get("short-lived").await.unwrap();
    assert_eq!(present, Some(1));

    tokio::time::sleep(Duration::from_millis(60)).await;
    let gone: Option<u32> = cache.get("short-lived").await.unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
async fn test_clear_all_empties_the_store() {
    let cache = memory_cache().await;
    cache.set("a", &1u32, None).await.unwrap();
    cache.set("b", &2u32, None).await.unwrap();

    cache.clear_all().await.unwrap();
    let a: Option<u32> = cache.get("a").await.unwrap();
    let b: Option<u32> = cache.get("b").await.unwrap();
    assert_eq!((a, b), (None, None));
}

#[tokio::test]
async fn test_rate_limiter_fallback_path_over_facade() {
    // The memory backend exposes no counting store, so this exercises the
    // get/set fallback path end to end
    let cache = memory_cache().await;
    assert!(cache.event_log().is_none());

    let limiter = RateLimiter::new(
        cache,
        RateLimitConfig {
            max_requests: 5,
            window_secs: 60,
        },
    );

    for _ in 0..5 {
        assert!(limiter.is_allowed("facade-key").await.unwrap());
    }
    assert!(!limiter.is_allowed("facade-key").await.unwrap());
}
