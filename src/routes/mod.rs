// ABOUTME: HTTP route assembly for the Meal Calorie API
// ABOUTME: Wires auth, calorie lookup, and health routers into one axum app
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Authentication routes (register, login)
pub mod auth;
/// Calorie lookup route
pub mod calories;
/// Health and readiness routes
pub mod health;

use crate::context::ServerContext;
use axum::extract::ConnectInfo;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Assemble the full application router
#[must_use]
pub fn router(ctx: Arc<ServerContext>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(ctx.clone()))
        .merge(auth::AuthRoutes::routes(ctx.clone()))
        .merge(calories::CalorieRoutes::routes(ctx))
        .layer(TraceLayer::new_for_http())
}

/// Client address for rate-limit keying, "anonymous" when unavailable
#[must_use]
pub fn client_ip(conn: Option<&ConnectInfo<SocketAddr>>) -> String {
    conn.map_or_else(|| "anonymous".to_owned(), |info| info.0.ip().to_string())
}
