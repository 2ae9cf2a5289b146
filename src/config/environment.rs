// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, runtime configuration parsing, and defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management for production deployment
//!
//! There is no implicit global settings object: `ServerConfig` is built once
//! in the binary and its sub-configs are handed to each component constructor.

use crate::cache::CacheConfig;
use crate::constants::{cache, limits, usda};
use crate::errors::{AppError, AppResult};
use crate::external::usda_client::UsdaClientConfig;
use crate::rate_limiting::RateLimitConfig;
use crate::services::calories::LookupConfig;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::env;
use std::time::Duration;
use tracing::{info, warn};

/// Strongly typed log level configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Redis connection and retry configuration
#[derive(Debug, Clone)]
pub struct RedisConnectionConfig {
    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,
    /// Per-command response timeout in seconds
    pub response_timeout_secs: u64,
    /// Retries for the initial connection before giving up
    pub initial_connection_retries: u32,
    /// Retries for automatic reconnection after a dropped connection
    pub reconnection_retries: u32,
    /// Exponent base for reconnection backoff
    pub retry_exponent_base: u64,
    /// First retry delay in milliseconds
    pub initial_retry_delay_ms: u64,
    /// Cap on the retry delay in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for RedisConnectionConfig {
    fn default() -> Self {
        Self {
            connection_timeout_secs: 5,
            response_timeout_secs: 2,
            initial_connection_retries: 3,
            reconnection_retries: 6,
            retry_exponent_base: 2,
            initial_retry_delay_ms: 100,
            max_retry_delay_ms: 5000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,
}

/// Authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens
    pub secret_key: String,
    /// Access token expiry in minutes
    pub token_expiry_minutes: i64,
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP API port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Authentication configuration
    pub auth: AuthConfig,
    /// USDA FoodData Central client configuration
    pub usda: UsdaClientConfig,
    /// Rate limiter configuration
    pub rate_limit: RateLimitConfig,
    /// Cache backend configuration
    pub cache: CacheConfig,
    /// Calorie lookup behavior
    pub lookup: LookupConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set environment variable fails to parse
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        // Load .env file if it exists
        if dotenvy::dotenv().is_err() {
            warn!("No .env file found, using process environment only");
        }

        let config = Self {
            host: env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            http_port: parse_var("APP_PORT", 8000)?,
            log_level: LogLevel::from_str_or_default(
                &env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            ),
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:mealcal.db".into()),
            },
            auth: AuthConfig {
                secret_key: secret_key_from_env(),
                token_expiry_minutes: parse_var(
                    "ACCESS_TOKEN_EXPIRE_MINUTES",
                    limits::DEFAULT_TOKEN_EXPIRY_MINUTES,
                )?,
            },
            usda: UsdaClientConfig {
                api_key: env::var("USDA_API_KEY").unwrap_or_default(),
                base_url: env::var("USDA_BASE_URL")
                    .unwrap_or_else(|_| usda::DEFAULT_BASE_URL.into()),
                timeout_secs: parse_var("USDA_TIMEOUT_SECS", usda::DEFAULT_TIMEOUT_SECS)?,
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_var("RATE_LIMIT", limits::DEFAULT_RATE_LIMIT)?,
                window_secs: parse_var(
                    "RATE_LIMIT_WINDOW",
                    limits::DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?,
            },
            cache: CacheConfig {
                max_entries: parse_var("CACHE_MAX_ENTRIES", cache::DEFAULT_CACHE_MAX_ENTRIES)?,
                redis_url: env::var("REDIS_URL").ok().filter(|v| !v.is_empty()),
                cleanup_interval: Duration::from_secs(parse_var(
                    "CACHE_CLEANUP_INTERVAL_SECS",
                    cache::DEFAULT_CLEANUP_INTERVAL_SECS,
                )?),
                enable_background_cleanup: true,
                redis_connection: RedisConnectionConfig::default(),
            },
            lookup: LookupConfig {
                page_size: usda::SEARCH_PAGE_SIZE,
                result_ttl_secs: parse_var("RESULT_CACHE_TTL_SECS", cache::DEFAULT_RESULT_TTL_SECS)?,
            },
        };

        Ok(config)
    }

    /// One-line configuration summary for startup logging
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "listen={}:{} db={} cache={} rate_limit={}/{}s usda_key={}",
            self.host,
            self.http_port,
            self.database.url,
            self.cache
                .redis_url
                .as_deref()
                .map_or("memory", |_| "redis"),
            self.rate_limit.max_requests,
            self.rate_limit.window_secs,
            if self.usda.api_key.is_empty() {
                "unset"
            } else {
                "set"
            },
        )
    }
}

/// Read an env var, falling back to a default and failing on parse errors
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> AppResult<T> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::config(format!("Invalid {name} value: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Resolve the JWT signing secret, generating a runtime one when unset
///
/// A placeholder secret (empty or starting with "change") is replaced with a
/// random value so the server still starts, at the cost of invalidating
/// tokens across restarts.
fn secret_key_from_env() -> String {
    let configured = env::var("SECRET_KEY").unwrap_or_default();
    if configured.is_empty() || configured.trim().to_lowercase().starts_with("change") {
        warn!(
            "SECRET_KEY is not set securely. Generated a runtime secret key. \
             For production, set SECRET_KEY in your .env."
        );
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect()
    } else {
        configured
    }
}
