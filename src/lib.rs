// ABOUTME: Main library entry point for the Meal Calorie API
// ABOUTME: User accounts plus USDA-backed calorie lookups with fuzzy matching
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Meal Calorie Server
//!
//! A thin HTTP backend that registers and authenticates users and proxies
//! food-nutrition lookups to USDA `FoodData` Central, adding a fuzzy-match
//! layer, per-key sliding-window rate limiting, and a short-lived result
//! cache.
//!
//! ## Architecture
//!
//! - **Routes**: axum handlers for auth, calorie lookup, and health probes
//! - **Services**: lookup orchestration and the calorie extraction heuristic
//! - **Cache**: pluggable backends (in-memory LRU, Redis) behind one contract
//! - **Rate limiting**: sliding-window log counted against the shared cache
//! - **External**: USDA search client behind a trait seam with a test mock
//!
//! All shared handles are built once at startup and injected through
//! [`context::ServerContext`]; there is no module-level mutable state.

/// Password hashing and JWT-based authentication
pub mod auth;

/// Cache abstraction layer with pluggable backends
pub mod cache;

/// Configuration management
pub mod config;

/// Application constants and default configuration values
pub mod constants;

/// Dependency injection context for request handlers
pub mod context;

/// SQLite-backed user store
pub mod database;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// External API clients (USDA FoodData Central)
pub mod external;

/// Production logging and structured output
pub mod logging;

/// Weighted token fuzzy matching
pub mod matching;

/// Common data models
pub mod models;

/// Sliding-window rate limiting
pub mod rate_limiting;

/// `HTTP` routes for registration, login, and calorie lookups
pub mod routes;

/// Domain service layer for calorie lookups
pub mod services;
