//! Admin authentication service.
//!
//! Password login, password changes and account creation for the CLI.
//! Hashes are Argon2id in PHC string format.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use techfix_core::{AdminUserId, Email};

use crate::db::{Database, RepositoryError};
use crate::models::{AdminUser, CurrentAdmin};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length, bounding hashing work.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Authentication service.
pub struct AuthService<'a> {
    db: &'a dyn Database,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is malformed,
    /// unknown, or the password is wrong. The three cases are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentAdmin, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let credentials = self
            .db
            .find_admin_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &credentials.password_hash)?;

        tracing::info!(admin_id = %credentials.user.id, "Admin logged in");
        Ok(CurrentAdmin::from(&credentials.user))
    }

    /// Change an admin's password after re-checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if `current` is wrong or the
    /// account no longer exists, and `AuthError::WeakPassword` if `new`
    /// fails validation.
    pub async fn change_password(
        &self,
        id: AdminUserId,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        let credentials = self
            .db
            .find_admin_by_id(id)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current, &credentials.password_hash)?;
        validate_password(new)?;

        let hash = hash_password(new)?;
        self.db
            .update_admin_password(id, &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::InvalidCredentials,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(admin_id = %id, "Admin password changed");
        Ok(())
    }

    /// Create an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`, `AuthError::WeakPassword` or
    /// `AuthError::AdminAlreadyExists`.
    pub async fn create_admin(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<AdminUser, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let hash = hash_password(password)?;

        self.db
            .create_admin(&email, name.trim(), &hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AdminAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Set an admin's password without knowing the current one (CLI only).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no admin has this email.
    pub async fn reset_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let credentials = self
            .db
            .find_admin_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let hash = hash_password(password)?;
        self.db
            .update_admin_password(credentials.user.id, &hash)
            .await?;
        Ok(())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Validate password requirements.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword` if the length is out of bounds.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
