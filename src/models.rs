// ABOUTME: Common data models for users and calorie lookup results
// ABOUTME: Defines the persisted User record and the cached CalorieResult
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::constants::{cache::RESULT_KEY_PREFIX, usda::SOURCE_LABEL};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: Option<String>,
    /// User email address (unique, used for login)
    pub email: String,
    /// Hashed password for authentication
    pub password_hash: String,
    /// Whether the user account is active
    pub is_active: bool,
    /// When the user account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with a fresh id
    #[must_use]
    pub fn new(
        first_name: String,
        last_name: Option<String>,
        email: String,
        password_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

/// Result of one calorie lookup, immutable once constructed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieResult {
    /// Dish name as supplied by the caller
    pub dish_name: String,
    /// Serving count as supplied by the caller
    pub servings: f64,
    /// Derived calories for a single serving, rounded to 2 decimals
    pub calories_per_serving: f64,
    /// `calories_per_serving * servings`, rounded to 2 decimals
    pub total_calories: f64,
    /// Data source label
    pub source: String,
    /// Description of the external record the lookup matched
    pub matched_item: String,
}

impl CalorieResult {
    /// Build a result from a raw per-serving figure, rounding both calorie
    /// fields to 2 decimal places
    #[must_use]
    pub fn new(
        dish_name: String,
        servings: f64,
        calories_per_serving: f64,
        matched_item: String,
    ) -> Self {
        let total = calories_per_serving * servings;
        Self {
            dish_name,
            servings,
            calories_per_serving: round2(calories_per_serving),
            total_calories: round2(total),
            source: SOURCE_LABEL.to_owned(),
            matched_item,
        }
    }

    /// Cache key for a lookup: lowercased dish name plus serving count
    #[must_use]
    pub fn cache_key(dish_name: &str, servings: f64) -> String {
        format!("{RESULT_KEY_PREFIX}{}:{servings}", dish_name.to_lowercase())
    }
}

/// Round to 2 decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_result_rounding() {
        let result = CalorieResult::new("pasta".into(), 3.0, 123.456, "Pasta, cooked".into());
        assert!((result.calories_per_serving - 123.46).abs() < f64::EPSILON);
        assert!((result.total_calories - 370.37).abs() < f64::EPSILON);
        assert_eq!(result.source, "USDA FoodData Central");
    }

    #[test]
    fn test_cache_key_is_lowercased() {
        assert_eq!(CalorieResult::cache_key("Chicken Curry", 2.0), "cal:chicken curry:2");
    }
}
