// ABOUTME: Configuration management for the Meal Calorie API
// ABOUTME: Environment-driven settings passed explicitly into each component
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Environment-based configuration management
pub mod environment;
