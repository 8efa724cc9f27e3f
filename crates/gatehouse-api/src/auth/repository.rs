//! User repository for PostgreSQL operations
//!
//! Persistence layer for user records over a pooled sqlx connection.
//! Expected table:
//!
//! ```sql
//! CREATE TABLE users (
//!     id       UUID PRIMARY KEY,
//!     username TEXT NOT NULL UNIQUE,
//!     name     TEXT NOT NULL,
//!     password TEXT NOT NULL,
//!     role     TEXT NOT NULL
//! );
//! ```
//!
//! Errors are logged here, at the point of occurrence, and returned
//! unchanged to the service layer for re-wrapping.

use super::models::User;
use sqlx::PgPool;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Repository errors
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("user not found")]
    NotFound,
}

/// User repository backed by PostgreSQL
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new user record
    ///
    /// A duplicate username violates the unique constraint and surfaces as a
    /// database error.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO users (id, username, name, password, role) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.role)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(username = %user.username, error = %e, "failed to insert user");
            RepositoryError::from(e)
        })?;

        Ok(())
    }

    /// Check whether a user with the given id exists
    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(id) FROM users WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(user_id = %id, error = %e, "failed to check user existence");
                RepositoryError::from(e)
            })?;

        Ok(count > 0)
    }

    /// Fetch a user by primary key
    pub async fn find_by_id(&self, id: Uuid) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, name, password, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(user_id = %id, error = %e, "failed to fetch user by id");
            RepositoryError::from(e)
        })?
        .ok_or_else(|| {
            error!(user_id = %id, "user not found");
            RepositoryError::NotFound
        })
    }

    /// Fetch a user by username
    pub async fn find_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, name, password, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(username = %username, error = %e, "failed to fetch user by username");
            RepositoryError::from(e)
        })?
        .ok_or_else(|| {
            error!(username = %username, "user not found");
            RepositoryError::NotFound
        })
    }

    /// Update a user's mutable fields
    ///
    /// Confirms the target id exists first; an absent id fails with
    /// [`RepositoryError::NotFound`] and writes nothing. The UPDATE is the
    /// only statement today, but it runs inside a transaction; any statement
    /// added to this path later must share that transaction.
    pub async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        if !self.exists_by_id(user.id).await? {
            error!(user_id = %user.id, "cannot update missing user");
            return Err(RepositoryError::NotFound);
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!(user_id = %user.id, error = %e, "failed to open transaction");
            RepositoryError::from(e)
        })?;

        sqlx::query("UPDATE users SET name = $1 WHERE id = $2")
            .bind(&user.name)
            .bind(user.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!(user_id = %user.id, error = %e, "failed to update user");
                RepositoryError::from(e)
            })?;

        tx.commit().await.map_err(|e| {
            error!(user_id = %user.id, error = %e, "failed to commit user update");
            RepositoryError::from(e)
        })?;

        Ok(())
    }
}
