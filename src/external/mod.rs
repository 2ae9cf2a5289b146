// ABOUTME: External API clients
// ABOUTME: Currently the USDA FoodData Central search client
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// USDA FoodData Central API client
pub mod usda_client;
