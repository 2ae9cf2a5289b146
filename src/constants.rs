// ABOUTME: Application constants and default configuration values
// ABOUTME: Centralizes limits, cache defaults, and external service settings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Request and validation limits
pub mod limits {
    /// Default number of requests allowed per rate-limit window
    pub const DEFAULT_RATE_LIMIT: u32 = 15;
    /// Default rate-limit window in seconds
    pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
    /// bcrypt only consumes the first 72 bytes of a password
    pub const BCRYPT_MAX_PASSWORD_BYTES: usize = 72;
    /// Minimum accepted password length
    pub const MIN_PASSWORD_LENGTH: usize = 8;
    /// Minimum accepted dish name length
    pub const MIN_DISH_NAME_LENGTH: usize = 2;
    /// Default JWT expiry in minutes
    pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 60;
}

/// Cache defaults and key namespaces
pub mod cache {
    /// Default maximum entries for the in-memory cache
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
    /// Default background cleanup interval in seconds
    pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300;
    /// Lookup results stay cached for this long
    pub const DEFAULT_RESULT_TTL_SECS: u64 = 60;
    /// Key prefix for cached calorie lookups
    pub const RESULT_KEY_PREFIX: &str = "cal:";
    /// Key prefix for rate-limit windows
    pub const RATE_KEY_PREFIX: &str = "rl:";
    /// Namespace prefix applied to every Redis key
    pub const CACHE_KEY_PREFIX: &str = "mealcal:";
}

/// USDA FoodData Central client defaults
pub mod usda {
    /// Default base URL for the USDA API
    pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Default request timeout in seconds
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    /// Candidates requested per lookup
    pub const SEARCH_PAGE_SIZE: u32 = 25;
    /// Source label attached to every calorie result
    pub const SOURCE_LABEL: &str = "USDA FoodData Central";
}

/// Service names for logging and diagnostics
pub mod service_names {
    pub const MEALCAL_SERVER: &str = "mealcal-server";
}
