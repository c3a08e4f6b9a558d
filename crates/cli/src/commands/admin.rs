//! Admin account commands.
//!
//! There is no signup page; accounts exist only through these commands.

use techfix_site::db::PgDatabase;
use techfix_site::services::{AuthError, AuthService};
use thiserror::Error;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// No account with this email.
    #[error("No admin user with email: {0}")]
    UnknownUser(String),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Create a new admin account.
///
/// # Returns
///
/// The ID of the created admin user.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<i32, AdminError> {
    let db = PgDatabase::new(connect().await?);

    tracing::info!("Creating admin user: {}", email);
    let admin = AuthService::new(&db)
        .create_admin(email, name, password)
        .await?;

    tracing::info!(
        "Admin user created successfully! ID: {}, Email: {}",
        admin.id,
        admin.email
    );
    Ok(admin.id.as_i32())
}

/// Replace the password of the admin with `email`.
pub async fn set_password(email: &str, password: &str) -> Result<(), AdminError> {
    let db = PgDatabase::new(connect().await?);

    AuthService::new(&db)
        .reset_password(email, password)
        .await
        .map_err(|e| match e {
            AuthError::InvalidCredentials => AdminError::UnknownUser(email.to_owned()),
            other => AdminError::Auth(other),
        })?;

    tracing::info!("Password updated for {}", email);
    Ok(())
}
