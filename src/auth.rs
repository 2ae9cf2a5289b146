// ABOUTME: Password hashing and JWT-based user authentication
// ABOUTME: Handles bcrypt credential checks plus HS256 token generation and validation
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Authentication
//!
//! bcrypt password hashing and HS256 access tokens. Tokens carry the user id
//! as `sub`; expiry is configured in minutes.

use crate::constants::limits::BCRYPT_MAX_PASSWORD_BYTES;
use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// `JWT` claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User `ID`
    pub sub: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// bcrypt ignores everything past 72 bytes; cut on a char boundary so the
/// hashed input is always valid UTF-8
fn truncate_password(password: &str) -> &str {
    if password.len() <= BCRYPT_MAX_PASSWORD_BYTES {
        return password;
    }
    let mut end = BCRYPT_MAX_PASSWORD_BYTES;
    while !password.is_char_boundary(end) {
        end -= 1;
    }
    &password[..end]
}

/// Hash a password with bcrypt
///
/// # Errors
///
/// Returns an error if bcrypt hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(truncate_password(password), bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
}

/// Verify a password against a stored bcrypt hash
///
/// # Errors
///
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    bcrypt::verify(truncate_password(password), password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))
}

/// Authentication manager for access tokens
#[derive(Clone)]
pub struct AuthManager {
    secret: Vec<u8>,
    token_expiry_minutes: i64,
}

impl AuthManager {
    /// Create a new authentication manager
    #[must_use]
    pub const fn new(secret: Vec<u8>, token_expiry_minutes: i64) -> Self {
        Self {
            secret,
            token_expiry_minutes,
        }
    }

    /// Generate an HS256 access token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(self.token_expiry_minutes);

        let claims = Claims {
            sub: user.id.to_string(),
            iat: now.timestamp(),
            exp: expiry.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))
    }

    /// Validate an access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an auth error for expired, tampered, or malformed tokens
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::auth_expired(),
                _ => AppError::auth_invalid(format!("Invalid token: {e}")),
            })
    }
}
