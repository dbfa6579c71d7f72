//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! kultr-cli migrate
//! ```
//!
//! Applies the migrations embedded from `crates/admin/migrations/`. The
//! admin server never migrates on startup, so run this before deploying a
//! release that adds one.

use thiserror::Error;

use super::CommandError;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run admin database migrations.
pub async fn run() -> Result<(), MigrationError> {
    let pool = super::connect().await?;

    let pending = kultr_admin::db::MIGRATOR.iter().count();
    tracing::info!(migrations = pending, "Running admin migrations...");
    kultr_admin::db::MIGRATOR.run(&pool).await?;

    tracing::info!("Admin migrations complete!");
    Ok(())
}
