//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use techfix_core::{AdminUserId, Email};

use super::AdminUser;

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
}

impl CurrentAdmin {
    /// Mint the capability required by content writes.
    ///
    /// Only the auth extractor holds a `CurrentAdmin` resolved from a live
    /// session, so this is the single place write access originates.
    #[must_use]
    pub(crate) fn write_capability(&self) -> WriteCapability {
        WriteCapability {
            admin_id: self.id,
            admin_email: self.email.clone(),
        }
    }
}

impl From<&AdminUser> for CurrentAdmin {
    fn from(user: &AdminUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Permission to change site content, resolved once per request.
///
/// Cannot be constructed outside this crate.
#[derive(Debug, Clone)]
pub struct WriteCapability {
    admin_id: AdminUserId,
    admin_email: Email,
}

impl WriteCapability {
    /// The admin the write is attributed to.
    #[must_use]
    pub const fn admin_id(&self) -> AdminUserId {
        self.admin_id
    }

    #[must_use]
    pub const fn admin_email(&self) -> &Email {
        &self.admin_email
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            admin_id: AdminUserId::new(1),
            admin_email: Email::parse("tests@techfixit.com")
                .unwrap_or_else(|_| unreachable!("literal email is valid")),
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for the admin page to return to after logging in.
    pub const RETURN_TO: &str = "return_to";
}
