// ABOUTME: Domain service layer for calorie lookups
// ABOUTME: Orchestration plus the calorie extraction heuristic
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Calorie lookup orchestration
pub mod calories;
/// Calories-per-serving extraction heuristic
pub mod extract;
