//! Database migration command.
//!
//! Applies `crates/site/migrations/` and then creates the session store's
//! `tower_sessions.session` table. Both steps are idempotent.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Session table error: {0}")]
    Sessions(#[from] sqlx::Error),
}

/// Run site migrations and create the session table.
pub async fn run() -> Result<(), MigrationError> {
    let pool = connect().await?;

    tracing::info!("Running site migrations...");
    sqlx::migrate!("../site/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
