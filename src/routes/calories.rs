// ABOUTME: Calorie lookup route handler
// ABOUTME: Rate limits per client IP, then delegates to CaloriesService
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::context::ServerContext;
use crate::errors::AppError;
use crate::services::calories::CaloriesService;
use axum::extract::{ConnectInfo, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;

/// Calorie lookup request
#[derive(Debug, Deserialize)]
pub struct CalorieRequest {
    pub dish_name: String,
    pub servings: f64,
}

/// Calorie lookup routes
pub struct CalorieRoutes;

impl CalorieRoutes {
    /// Create the calorie lookup router
    #[must_use]
    pub fn routes(ctx: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/get-calories", post(Self::handle_get_calories))
            .with_state(ctx)
    }

    async fn handle_get_calories(
        State(ctx): State<Arc<ServerContext>>,
        conn: Option<ConnectInfo<SocketAddr>>,
        Json(request): Json<CalorieRequest>,
    ) -> Result<Response, AppError> {
        let ip = super::client_ip(conn.as_ref());
        if !ctx.rate_limiter().is_allowed(&ip).await? {
            return Err(AppError::rate_limited());
        }

        let service = CaloriesService::new(
            ctx.food_search().clone(),
            ctx.cache().clone(),
            ctx.config().lookup,
        );
        let result = service
            .get_calories(&request.dish_name, request.servings)
            .await?;

        Ok(Json(result).into_response())
    }
}
