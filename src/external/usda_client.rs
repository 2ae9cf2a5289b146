// ABOUTME: USDA FoodData Central API client for nutritional data retrieval
// ABOUTME: Implements food search behind a trait seam with a mock for testing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! USDA `FoodData` Central API Client
//!
//! Searches the USDA `FoodData` Central database for food records. The API is
//! free and requires no authentication beyond an API key. Responses are
//! heterogeneous: no field of a returned record is guaranteed present, and
//! `nutrientNumber` arrives as either a string or a number depending on the
//! record's data type, so the wire model keeps everything optional.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use crate::constants::usda::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult, ErrorCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// One food record as returned by the USDA search endpoint
///
/// Every field is optional; the calorie extractor degrades gracefully over
/// whatever subset is present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodRecord {
    /// `FoodData` Central ID
    pub fdc_id: Option<u64>,
    /// Food description
    pub description: Option<String>,
    /// Lowercased description, sometimes present instead of `description`
    pub lowercase_description: Option<String>,
    /// Data type (e.g., "Branded", "Survey (FNDDS)", "Foundation", "SR Legacy")
    pub data_type: Option<String>,
    /// Nutrient entries with amounts
    pub food_nutrients: Vec<FoodNutrient>,
    /// Label nutrients (some branded foods)
    pub label_nutrients: Option<BTreeMap<String, LabelNutrient>>,
    /// Serving size
    pub serving_size: Option<f64>,
    /// Serving size unit
    pub serving_size_unit: Option<String>,
    /// Portion entries, sometimes with gram weights
    pub food_portions: Vec<FoodPortion>,
}

impl FoodRecord {
    /// Best available display name for this record
    #[must_use]
    pub fn display_name(&self) -> String {
        self.description
            .clone()
            .or_else(|| self.lowercase_description.clone())
            .or_else(|| self.data_type.clone())
            .unwrap_or_default()
    }
}

/// One nutrient entry on a food record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodNutrient {
    /// Nutrient ID
    pub nutrient_id: Option<u64>,
    /// Nutrient code; string or number on the wire
    pub nutrient_number: Option<NumericCode>,
    /// Nutrient name (e.g., "Protein", "Energy")
    pub nutrient_name: Option<String>,
    /// Nutrient unit (e.g., "g", "kcal", "mg")
    pub unit_name: Option<String>,
    /// Amount in `unit_name`
    pub value: Option<f64>,
}

/// A numeric code that the API serves as either a string or a number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericCode {
    Number(f64),
    Text(String),
}

impl NumericCode {
    /// The code as an integer, when it parses as one
    #[must_use]
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::Number(n) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                // Fractional or out-of-range codes are not valid nutrient numbers
                if n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX) {
                    Some(*n as u32)
                } else {
                    None
                }
            }
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A label-nutrient value; branded foods serve `{"value": n}`, some records a
/// bare number
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelNutrient {
    Detailed { value: Option<f64> },
    Plain(f64),
}

impl LabelNutrient {
    /// The numeric value, when present
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Detailed { value } => *value,
            Self::Plain(v) => Some(*v),
        }
    }
}

/// One portion entry on a food record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodPortion {
    /// Portion weight in grams
    pub gram_weight: Option<f64>,
    /// Portion amount
    pub amount: Option<f64>,
    /// Portion description
    pub portion_description: Option<String>,
    /// Portion modifier text
    pub modifier: Option<String>,
}

/// USDA API search response
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    foods: Vec<FoodRecord>,
    // Pagination fields not currently exposed but part of USDA API contract
}

/// Search capability over the external nutrition database
///
/// The seam the calorie service depends on, so tests can substitute a mock.
#[async_trait::async_trait]
pub trait FoodSearch: Send + Sync {
    /// Search for foods by query string, returning up to `page_size` records
    ///
    /// # Errors
    ///
    /// Returns an error on invalid input or upstream failure
    async fn search(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodRecord>>;
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
}

impl UsdaClient {
    /// Create a new USDA API client with a bounded request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build
    pub fn new(config: UsdaClientConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait::async_trait]
impl FoodSearch for UsdaClient {
    async fn search(&self, query: &str, page_size: u32) -> AppResult<Vec<FoodRecord>> {
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }

        if page_size == 0 || page_size > 200 {
            return Err(AppError::invalid_input(
                "Page size must be between 1 and 200",
            ));
        }

        let url = format!("{}/foods/search", self.config.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("pageSize", &page_size.to_string()),
                ("api_key", &self.config.api_key),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::new(
                        ErrorCode::ExternalServiceUnavailable,
                        format!("USDA API timed out after {}s", self.config.timeout_secs),
                    )
                } else {
                    AppError::external_service("USDA API", e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "USDA API",
                format!(
                    "HTTP {}: {}",
                    response.status(),
                    response.text().await.unwrap_or_default()
                ),
            ));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::external_service("USDA API", format!("JSON parse error: {e}"))
        })?;

        Ok(search_response.foods)
    }
}

/// Mock search client for testing (no API calls)
///
/// Returns its canned records for any non-empty query and counts invocations
/// so tests can assert whether the upstream was consulted.
#[derive(Default)]
pub struct MockUsdaClient {
    records: Vec<FoodRecord>,
    calls: AtomicUsize,
}

impl MockUsdaClient {
    /// Create a mock that answers every search with the given records
    #[must_use]
    pub fn with_records(records: Vec<FoodRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of search calls made so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl FoodSearch for MockUsdaClient {
    async fn search(&self, query: &str, _page_size: u32) -> AppResult<Vec<FoodRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if query.is_empty() {
            return Err(AppError::invalid_input("Search query cannot be empty"));
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_record_tolerates_sparse_json() {
        let record: FoodRecord = serde_json::from_str("{}").unwrap();
        assert!(record.description.is_none());
        assert!(record.food_nutrients.is_empty());
        assert_eq!(record.display_name(), "");
    }

    #[test]
    fn test_nutrient_number_accepts_string_and_number() {
        let as_string: FoodNutrient =
            serde_json::from_str(r#"{"nutrientNumber": "208", "value": 52.0}"#).unwrap();
        assert_eq!(as_string.nutrient_number.unwrap().as_u32(), Some(208));

        let as_number: FoodNutrient =
            serde_json::from_str(r#"{"nutrientNumber": 208, "value": 52.0}"#).unwrap();
        assert_eq!(as_number.nutrient_number.unwrap().as_u32(), Some(208));
    }

    #[test]
    fn test_label_nutrient_accepts_both_shapes() {
        let detailed: LabelNutrient = serde_json::from_str(r#"{"value": 250.0}"#).unwrap();
        assert_eq!(detailed.value(), Some(250.0));

        let plain: LabelNutrient = serde_json::from_str("250.0").unwrap();
        assert_eq!(plain.value(), Some(250.0));
    }

    #[test]
    fn test_search_response_parses_real_shape() {
        let json = r#"{
            "totalHits": 1,
            "foods": [{
                "fdcId": 171688,
                "description": "Apples, raw, with skin",
                "dataType": "SR Legacy",
                "foodNutrients": [
                    {"nutrientId": 1008, "nutrientNumber": "208", "nutrientName": "Energy", "unitName": "KCAL", "value": 52.0}
                ],
                "servingSize": 182.0,
                "servingSizeUnit": "g"
            }]
        }"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.foods.len(), 1);
        assert_eq!(
            response.foods[0].display_name(),
            "Apples, raw, with skin"
        );
        assert_eq!(response.foods[0].serving_size, Some(182.0));
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockUsdaClient::with_records(vec![FoodRecord::default()]);
        assert_eq!(mock.call_count(), 0);
        mock.search("apple", 25).await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
