// ABOUTME: Shared helpers for integration tests
// ABOUTME: Builds in-memory contexts, caches, and canned USDA records
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(dead_code)] // Each test binary uses a different subset of helpers

use mealcal_server::auth::AuthManager;
use mealcal_server::cache::memory::InMemoryCache;
use mealcal_server::cache::{Cache, CacheConfig, CacheProvider};
use mealcal_server::config::environment::{AuthConfig, DatabaseConfig, LogLevel, ServerConfig};
use mealcal_server::context::ServerContext;
use mealcal_server::database::Database;
use mealcal_server::external::usda_client::{
    FoodNutrient, FoodRecord, FoodSearch, NumericCode, UsdaClientConfig,
};
use mealcal_server::rate_limiting::RateLimitConfig;
use mealcal_server::services::calories::LookupConfig;
use std::sync::Arc;

/// An in-memory cache with background cleanup disabled for tests
pub async fn memory_cache() -> Cache {
    let inner = InMemoryCache::new(CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    })
    .await
    .unwrap();
    Cache::Memory(inner)
}

/// A server configuration pointing at in-memory backends
pub fn test_config(rate_limit: u32) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        http_port: 0,
        log_level: LogLevel::Info,
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
        },
        auth: AuthConfig {
            secret_key: "integration-test-secret".into(),
            token_expiry_minutes: 60,
        },
        usda: UsdaClientConfig::default(),
        rate_limit: RateLimitConfig {
            max_requests: rate_limit,
            window_secs: 60,
        },
        cache: CacheConfig {
            enable_background_cleanup: false,
            ..CacheConfig::default()
        },
        lookup: LookupConfig::default(),
    }
}

/// A full server context over in-memory backends and the given search stub
pub async fn test_context(search: Arc<dyn FoodSearch>, rate_limit: u32) -> Arc<ServerContext> {
    let config = test_config(rate_limit);
    let database = Database::new(&config.database.url).await.unwrap();
    let cache = memory_cache().await;
    let auth = AuthManager::new(
        config.auth.secret_key.as_bytes().to_vec(),
        config.auth.token_expiry_minutes,
    );

    Arc::new(ServerContext::new(
        Arc::new(config),
        Arc::new(database),
        cache,
        Arc::new(auth),
        search,
    ))
}

/// A branded record whose nutrient list reports `kcal` per serving
pub fn branded_record(description: &str, kcal: f64) -> FoodRecord {
    FoodRecord {
        fdc_id: Some(1),
        description: Some(description.to_owned()),
        data_type: Some("Branded".into()),
        food_nutrients: vec![FoodNutrient {
            nutrient_id: Some(1008),
            nutrient_number: Some(NumericCode::Text("208".into())),
            nutrient_name: Some("Energy".into()),
            unit_name: Some("KCAL".into()),
            value: Some(kcal),
            ..FoodNutrient::default()
        }],
        ..FoodRecord::default()
    }
}

/// A legacy record reporting `kcal_per_100g` with one portion gram weight
pub fn legacy_record(description: &str, kcal_per_100g: f64, gram_weight: f64) -> FoodRecord {
    use mealcal_server::external::usda_client::FoodPortion;
    FoodRecord {
        fdc_id: Some(2),
        description: Some(description.to_owned()),
        data_type: Some("SR Legacy".into()),
        food_nutrients: vec![FoodNutrient {
            nutrient_name: Some("Energy".into()),
            unit_name: Some("KCAL".into()),
            value: Some(kcal_per_100g),
            ..FoodNutrient::default()
        }],
        food_portions: vec![FoodPortion {
            gram_weight: Some(gram_weight),
            ..FoodPortion::default()
        }],
        ..FoodRecord::default()
    }
}
