//! Typed identifiers.
//!
//! Content rows use client-generated string ids (UUIDs minted by the admin
//! editors), so only admin accounts get a numeric newtype.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Primary key of an `admin_users` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(transparent)]
pub struct AdminUserId(i32);

impl AdminUserId {
    /// Create a new ID from an i32 value.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AdminUserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for AdminUserId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}
