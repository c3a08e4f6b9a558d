//! Command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

/// Failure to reach the site database.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the site database named by `SITE_DATABASE_URL`, falling back
/// to `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SITE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(secrecy::SecretString::from)
        .map_err(|_| ConnectError::MissingEnvVar("SITE_DATABASE_URL"))?;

    tracing::info!("Connecting to site database...");
    Ok(techfix_site::db::create_pool(&database_url).await?)
}
