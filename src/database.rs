// ABOUTME: SQLite-backed user store built on sqlx
// ABOUTME: Ensures the schema at startup and provides user CRUD for auth flows
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! User persistence layer
//!
//! A thin sqlx wrapper around the `users` table. The schema is ensured at
//! startup rather than through a migration directory; the table is small and
//! additive changes are applied with `CREATE TABLE IF NOT EXISTS`.

use crate::errors::{AppError, AppResult};
use crate::models::User;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

/// User database handle, cheap to clone
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the database and ensure the schema exists
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema creation fails
    pub async fn new(url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::config(format!("Invalid database URL '{url}': {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let database = Self { pool };
        database.ensure_schema().await?;
        Ok(database)
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users (email)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new user
    ///
    /// # Errors
    ///
    /// Returns a database error if the insert fails, including unique
    /// constraint violations on email
    pub async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, is_active, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(user.id.to_string())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(i32::from(user.is_active))
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Look up a user by email
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, first_name, last_name, email, password_hash, is_active, created_at
             FROM users WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_user).transpose()
    }

    /// Count registered users
    ///
    /// # Errors
    ///
    /// Returns a database error if the query fails
    pub async fn user_count(&self) -> AppResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<i64, _>("n"))
    }

    /// Verify the database connection is healthy
    ///
    /// # Errors
    ///
    /// Returns a database error if the probe query fails
    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_user(row: sqlx::sqlite::SqliteRow) -> AppResult<User> {
    let id_raw: String = row.get("id");
    let id = Uuid::parse_str(&id_raw)
        .map_err(|e| AppError::database(format!("Corrupt user id '{id_raw}': {e}")))?;

    let created_raw: String = row.get("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::database(format!("Corrupt created_at '{created_raw}': {e}")))?;

    Ok(User {
        id,
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        is_active: row.get::<i32, _>("is_active") != 0,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_database() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = test_database().await;
        let user = User::new(
            "Ada".into(),
            Some("Lovelace".into()),
            "ada@example.com".into(),
            "hash".into(),
        );
        db.create_user(&user).await.unwrap();

        let fetched = db.get_user_by_email("ada@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
        assert_eq!(fetched.first_name, "Ada");
        assert_eq!(fetched.last_name.as_deref(), Some("Lovelace"));
        assert!(fetched.is_active);
    }

    #[tokio::test]
    async fn test_unknown_email_returns_none() {
        let db = test_database().await;
        assert!(db.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_database().await;
        let first = User::new("A".into(), None, "dup@example.com".into(), "h1".into());
        let second = User::new("B".into(), None, "dup@example.com".into(), "h2".into());
        db.create_user(&first).await.unwrap();
        assert!(db.create_user(&second).await.is_err());
        assert_eq!(db.user_count().await.unwrap(), 1);
    }
}
