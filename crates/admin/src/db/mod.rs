//! User storage for the admin API.
//!
//! # Tables
//!
//! - `users` - Accounts managed through `/admin/users` (email is `UNIQUE`)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/`, embedded in
//! [`MIGRATOR`], and run via:
//! ```bash
//! cargo run -p kultr-cli -- migrate
//! ```
//! The server never migrates on startup.

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use kultr_core::UserId;

use crate::models::{NewUser, User, UserListQuery, UserStats};

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryUserStore;
pub use users::UserRepository;

/// Embedded admin migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations behind the user endpoints.
///
/// [`UserRepository`] is the `PostgreSQL` implementation. Tests use the
/// in-memory `MemoryUserStore` (feature `test-support`).
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Newest-first page of users, optionally filtered by a case-insensitive
    /// substring of name or email.
    async fn list(&self, query: &UserListQuery) -> Result<Vec<User>, RepositoryError>;

    /// Insert a user. A duplicate email is [`RepositoryError::Conflict`].
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Replace name, email, and role. [`RepositoryError::NotFound`] when no
    /// row has `id`.
    async fn update(&self, id: UserId, user: &NewUser) -> Result<User, RepositoryError>;

    /// Delete by id. [`RepositoryError::NotFound`] when no row has `id`.
    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;

    /// Four independent counts; no transaction spans them.
    async fn stats(&self) -> Result<UserStats, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Message used when an insert or update hits the email constraint.
pub const DUPLICATE_EMAIL: &str = "email already exists";

/// Map a unique violation to [`RepositoryError::Conflict`], anything else to
/// [`RepositoryError::Database`].
pub(crate) fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(DUPLICATE_EMAIL.to_string());
    }
    RepositoryError::Database(e)
}
