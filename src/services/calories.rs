// ABOUTME: Calorie lookup orchestration over search, fuzzy match, and extraction
// ABOUTME: Validates input, consults the result cache, and assembles CalorieResult
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Calorie Lookup Service
//!
//! Glue around the interesting parts: validate, check the result cache, pull
//! candidates from the external search, fuzzy-pick the best record, extract a
//! per-serving figure, multiply, round, cache for a short TTL.

use crate::cache::Cache;
use crate::constants::limits::MIN_DISH_NAME_LENGTH;
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::external::usda_client::FoodSearch;
use crate::matching;
use crate::models::CalorieResult;
use crate::services::extract;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Calorie lookup behavior configuration
#[derive(Debug, Clone, Copy)]
pub struct LookupConfig {
    /// Candidates requested from the external search
    pub page_size: u32,
    /// Result cache TTL in seconds
    pub result_ttl_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            page_size: crate::constants::usda::SEARCH_PAGE_SIZE,
            result_ttl_secs: crate::constants::cache::DEFAULT_RESULT_TTL_SECS,
        }
    }
}

/// Calorie lookup service
pub struct CaloriesService {
    search: Arc<dyn FoodSearch>,
    cache: Cache,
    config: LookupConfig,
}

impl CaloriesService {
    /// Create a lookup service over the given search capability and cache
    #[must_use]
    pub const fn new(search: Arc<dyn FoodSearch>, cache: Cache, config: LookupConfig) -> Self {
        Self {
            search,
            cache,
            config,
        }
    }

    /// Look up calories for `servings` portions of `dish_name`
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for non-positive servings or a too-short dish name,
    ///   before any external call is made
    /// - `ResourceNotFound` when no candidates come back or no energy value
    ///   can be derived from the best match
    /// - upstream errors from the external search, unchanged
    pub async fn get_calories(&self, dish_name: &str, servings: f64) -> AppResult<CalorieResult> {
        if !servings.is_finite() || servings <= 0.0 {
            return Err(AppError::invalid_input("Servings must be > 0"));
        }
        if dish_name.trim().len() < MIN_DISH_NAME_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Dish name must be at least {MIN_DISH_NAME_LENGTH} characters"
            )));
        }

        let cache_key = CalorieResult::cache_key(dish_name, servings);
        if let Some(cached) = self.cache.get::<CalorieResult>(&cache_key).await? {
            debug!(dish = dish_name, "calorie lookup served from cache");
            return Ok(cached);
        }

        let foods = self.search.search(dish_name, self.config.page_size).await?;
        if foods.is_empty() {
            return Err(AppError::not_found("Dish"));
        }

        let candidates: Vec<String> = foods.iter().map(|f| f.display_name()).collect();
        let chosen = match matching::best_match(dish_name, &candidates, 1).first() {
            Some(top) => &foods[top.index],
            // Fuzzy found nothing viable: degrade to the first result rather
            // than failing the lookup
            None => &foods[0],
        };

        let per_serving = extract::extract(chosen).ok_or_else(|| {
            AppError::new(
                ErrorCode::ResourceNotFound,
                "Calorie info not available for best match",
            )
        })?;

        let result = CalorieResult::new(
            dish_name.to_owned(),
            servings,
            per_serving,
            chosen.display_name(),
        );

        self.cache
            .set(
                &cache_key,
                &result,
                Some(Duration::from_secs(self.config.result_ttl_secs)),
            )
            .await?;

        debug!(
            dish = dish_name,
            matched = %result.matched_item,
            total = result.total_calories,
            "calorie lookup resolved"
        );
        Ok(result)
    }
}
