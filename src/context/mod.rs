// ABOUTME: Dependency injection context handed to every request handler
// ABOUTME: Built once at startup; replaces late-bound module-level state
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Server dependency context
//!
//! All shared handles (database, cache, auth manager, external search client,
//! rate limiter) are constructed in the binary and passed into the axum
//! router as state. Handlers never reach for globals.

use crate::auth::AuthManager;
use crate::cache::Cache;
use crate::config::environment::ServerConfig;
use crate::database::Database;
use crate::external::usda_client::FoodSearch;
use crate::rate_limiting::RateLimiter;
use std::sync::Arc;

/// Shared server dependencies
#[derive(Clone)]
pub struct ServerContext {
    config: Arc<ServerConfig>,
    database: Arc<Database>,
    cache: Cache,
    auth: Arc<AuthManager>,
    food_search: Arc<dyn FoodSearch>,
    rate_limiter: RateLimiter,
}

impl ServerContext {
    /// Assemble the context from its parts
    #[must_use]
    pub fn new(
        config: Arc<ServerConfig>,
        database: Arc<Database>,
        cache: Cache,
        auth: Arc<AuthManager>,
        food_search: Arc<dyn FoodSearch>,
    ) -> Self {
        let rate_limiter = RateLimiter::new(cache.clone(), config.rate_limit);
        Self {
            config,
            database,
            cache,
            auth,
            food_search,
            rate_limiter,
        }
    }

    /// Server configuration
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// User database
    #[must_use]
    pub const fn database(&self) -> &Arc<Database> {
        &self.database
    }

    /// Shared cache backend
    #[must_use]
    pub const fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Authentication manager
    #[must_use]
    pub const fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// External food search capability
    #[must_use]
    pub const fn food_search(&self) -> &Arc<dyn FoodSearch> {
        &self.food_search
    }

    /// Shared rate limiter
    #[must_use]
    pub const fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
