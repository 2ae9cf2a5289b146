// ABOUTME: User authentication route handlers for registration and login
// ABOUTME: Thin axum wrappers delegating business logic to AuthService
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Authentication routes for user management
//!
//! Registration and login. Both endpoints are rate limited per client IP
//! before any database work happens.

use crate::auth::{hash_password, verify_password};
use crate::constants::limits::MIN_PASSWORD_LENGTH;
use crate::context::ServerContext;
use crate::errors::AppError;
use crate::models::User;
use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;

/// User registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
    pub password: String,
}

/// User login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Login response carrying the access token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

/// Authentication service for business logic
#[derive(Clone)]
pub struct AuthService {
    ctx: Arc<ServerContext>,
}

impl AuthService {
    #[must_use]
    pub const fn new(ctx: Arc<ServerContext>) -> Self {
        Self { ctx }
    }

    /// Handle user registration
    ///
    /// # Errors
    /// Returns an error when validation fails, the email is taken, or the
    /// database insert fails
    pub async fn register(&self, request: RegisterRequest) -> Result<UserInfo, AppError> {
        tracing::info!("User registration attempt for email: {}", request.email);

        if !Self::is_valid_email(&request.email) {
            return Err(AppError::invalid_input("Invalid email format"));
        }
        if request.first_name.trim().is_empty() {
            return Err(AppError::invalid_input("First name must not be empty"));
        }
        if request.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AppError::invalid_input(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self
            .ctx
            .database()
            .get_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(AppError::invalid_input("Email already registered"));
        }

        let password_hash = hash_password(&request.password)?;
        let user = User::new(
            request.first_name,
            request.last_name,
            request.email,
            password_hash,
        );
        self.ctx.database().create_user(&user).await?;

        tracing::info!("Registered new user: {}", user.email);
        Ok(UserInfo::from(&user))
    }

    /// Handle user login
    ///
    /// # Errors
    /// Returns an auth error for unknown emails or wrong passwords, without
    /// distinguishing the two
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, AppError> {
        let user = self.ctx.database().get_user_by_email(&request.email).await?;

        let Some(user) = user else {
            tracing::warn!("Failed login attempt for user: {}", request.email);
            return Err(AppError::auth_invalid("Invalid email or password"));
        };

        if !user.is_active || !verify_password(&request.password, &user.password_hash)? {
            tracing::warn!("Failed login attempt for user: {}", request.email);
            return Err(AppError::auth_invalid("Invalid email or password"));
        }

        let access_token = self.ctx.auth().generate_token(&user)?;
        Ok(TokenResponse {
            access_token,
            token_type: "bearer".to_owned(),
            user: UserInfo::from(&user),
        })
    }

    /// Minimal structural email check
    #[must_use]
    pub fn is_valid_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create the auth router
    #[must_use]
    pub fn routes(ctx: Arc<ServerContext>) -> Router {
        Router::new()
            .route("/auth/register", post(Self::handle_register))
            .route("/auth/login", post(Self::handle_login))
            .with_state(ctx)
    }

    async fn handle_register(
        State(ctx): State<Arc<ServerContext>>,
        conn: Option<ConnectInfo<SocketAddr>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let ip = super::client_ip(conn.as_ref());
        if !ctx.rate_limiter().is_allowed(&format!("register:{ip}")).await? {
            return Err(AppError::rate_limited());
        }

        let user = AuthService::new(ctx).register(request).await?;
        Ok((StatusCode::CREATED, Json(user)).into_response())
    }

    async fn handle_login(
        State(ctx): State<Arc<ServerContext>>,
        conn: Option<ConnectInfo<SocketAddr>>,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let ip = super::client_ip(conn.as_ref());
        if !ctx.rate_limiter().is_allowed(&format!("login:{ip}")).await? {
            return Err(AppError::rate_limited());
        }

        let token = AuthService::new(ctx).login(request).await?;
        Ok((StatusCode::OK, Json(token)).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(AuthService::is_valid_email("user@example.com"));
        assert!(AuthService::is_valid_email("a.b+c@sub.example.org"));
        assert!(!AuthService::is_valid_email("no-at-sign"));
        assert!(!AuthService::is_valid_email("@example.com"));
        assert!(!AuthService::is_valid_email("user@nodot"));
        assert!(!AuthService::is_valid_email("user@.leading"));
    }
}
