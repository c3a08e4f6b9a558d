//! Admin user domain types.

use chrono::{DateTime, Utc};

use techfix_core::{AdminUserId, Email};

/// An admin user (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An admin user together with their Argon2 password hash.
///
/// Only the auth service sees this type; everything else works with
/// [`AdminUser`] or the session's `CurrentAdmin`.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub user: AdminUser,
    /// PHC-format Argon2id hash.
    pub password_hash: String,
}
