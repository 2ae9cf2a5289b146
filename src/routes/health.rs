// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Liveness plus a readiness probe that exercises the database and cache
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Health check routes for service monitoring
//!
//! `/health` is a pure liveness probe; `/ready` verifies the database and
//! cache backends actually respond.

use crate::context::ServerContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    #[must_use]
    pub fn routes(ctx: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .route("/ready", get(Self::handle_ready))
            .with_state(ctx)
    }

    async fn handle_health() -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339()
        }))
    }

    async fn handle_ready(State(ctx): State<Arc<ServerContext>>) -> Response {
        let database_ok = ctx.database().health_check().await.is_ok();
        let cache_ok = ctx.cache().health_check().await.is_ok();

        let status = if database_ok && cache_ok {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        let body = Json(serde_json::json!({
            "status": if status == StatusCode::OK { "ready" } else { "degraded" },
            "database": database_ok,
            "cache": cache_ok,
            "cache_backend": ctx.cache().backend_name(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));

        (status, body).into_response()
    }
}
