//! Database access for site content and admin accounts.
//!
//! # Tables
//!
//! - `site_content` - Singleton documents keyed by content kind
//! - `services`, `pricing_plans`, `testimonials`, `legal_pages` - Collections
//! - `admin_users` - Accounts allowed into `/admin`
//! - `tower_sessions.session` - Admin sessions (created by the session store)
//!
//! Stores implement [`ContentStore`] and [`AdminUserStore`]. The production
//! store is [`PgDatabase`]; [`InMemoryDatabase`] backs tests and local demos.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/site/migrations/` and run via:
//! ```bash
//! cargo run -p techfix-cli -- migrate
//! ```

mod admin_users;
pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use techfix_core::{AdminUserId, ContentKind, Email, Row};

use crate::models::{AdminCredentials, AdminUser};

pub use memory::InMemoryDatabase;
pub use postgres::PgDatabase;

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

/// A collection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Services,
    PricingPlans,
    Testimonials,
    LegalPages,
}

impl Table {
    pub const ALL: [Self; 4] = [
        Self::Services,
        Self::PricingPlans,
        Self::Testimonials,
        Self::LegalPages,
    ];

    /// The table for a collection content kind.
    #[must_use]
    pub const fn for_kind(kind: ContentKind) -> Option<Self> {
        match kind {
            ContentKind::Services => Some(Self::Services),
            ContentKind::PricingPlans => Some(Self::PricingPlans),
            ContentKind::Testimonials => Some(Self::Testimonials),
            ContentKind::LegalPages => Some(Self::LegalPages),
            ContentKind::HeroSection
            | ContentKind::FooterContent
            | ContentKind::AboutPage
            | ContentKind::ContactPage => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::PricingPlans => "pricing_plans",
            Self::Testimonials => "testimonials",
            Self::LegalPages => "legal_pages",
        }
    }

    /// Columns written on upsert. `id` comes first and is the conflict key.
    #[must_use]
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Services => &[
                "id",
                "slug",
                "title",
                "short_description",
                "full_description",
                "icon",
                "is_exclusive",
                "features",
                "display_order",
                "image_url",
            ],
            Self::PricingPlans => &[
                "id",
                "slug",
                "name",
                "price",
                "period",
                "description",
                "benefits_description",
                "features",
                "is_popular",
                "featured",
                "cta",
            ],
            Self::Testimonials => &[
                "id",
                "author_name",
                "author_role",
                "content",
                "rating",
                "avatar_url",
            ],
            Self::LegalPages => &["id", "slug", "title", "content", "last_updated"],
        }
    }

    /// Listing order for reads, if the table has one.
    #[must_use]
    pub const fn order(self) -> Option<RowOrder> {
        match self {
            Self::Services => Some(RowOrder::Numeric("display_order")),
            // Display strings sorted as text: "$1,000" sorts before "$99".
            Self::PricingPlans => Some(RowOrder::Text("price")),
            Self::Testimonials | Self::LegalPages => None,
        }
    }
}

/// Ascending sort applied to a collection read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrder {
    /// Integer column.
    Numeric(&'static str),
    /// Text column compared byte-wise.
    Text(&'static str),
}

impl RowOrder {
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Numeric(column) | Self::Text(column) => column,
        }
    }
}

/// A row of `site_content`.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteSetting {
    pub key: String,
    pub data: Value,
    pub updated_at: DateTime<Utc>,
}

/// Row-level access to site content.
#[async_trait]
pub trait ContentStore: Send + Sync + 'static {
    /// Fetch the `site_content` row for `key`.
    async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, RepositoryError>;

    /// Insert or wholesale replace the `site_content` row for `key`.
    async fn upsert_setting(
        &self,
        key: &str,
        data: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// All rows of `table`, in the table's listing order.
    async fn select_rows(&self, table: Table) -> Result<Vec<Row>, RepositoryError>;

    /// The first row of `table` whose `column` equals `value`.
    async fn select_row_by(
        &self,
        table: Table,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Row>, RepositoryError>;

    /// Insert or replace `rows`, keyed by `id`.
    async fn upsert_rows(&self, table: Table, rows: &[Row]) -> Result<(), RepositoryError>;

    /// Make `rows` the complete contents of `table`: upsert them, then delete
    /// every row whose `id` was not submitted. An empty slice empties the
    /// table. Both steps succeed or neither does. Returns the number of
    /// rows deleted.
    async fn replace_rows(&self, table: Table, rows: &[Row]) -> Result<u64, RepositoryError>;

    /// Check connectivity.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Access to admin accounts.
#[async_trait]
pub trait AdminUserStore: Send + Sync + 'static {
    async fn find_admin_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminCredentials>, RepositoryError>;

    async fn find_admin_by_id(
        &self,
        id: AdminUserId,
    ) -> Result<Option<AdminCredentials>, RepositoryError>;

    /// Create an admin account.
    ///
    /// Returns `RepositoryError::Conflict` if the email is taken.
    async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError>;

    /// Replace an admin's password hash.
    ///
    /// Returns `RepositoryError::NotFound` if the account does not exist.
    async fn update_admin_password(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;
}

/// Everything the site needs from its database.
pub trait Database: ContentStore + AdminUserStore {}

impl<T: ContentStore + AdminUserStore> Database for T {}

/// The `id` of every row, in order. Rows without a string id are skipped.
pub(crate) fn row_ids(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get("id").and_then(Value::as_str))
        .map(str::to_owned)
        .collect()
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_every_collection_kind_has_a_table() {
        for kind in ContentKind::ALL {
            assert_eq!(Table::for_kind(kind).is_some(), !kind.is_singleton());
        }
    }

    #[test]
    fn test_columns_start_with_id() {
        for table in Table::ALL {
            assert_eq!(table.columns().first(), Some(&"id"));
        }
    }

    #[test]
    fn test_order_columns_exist() {
        for table in Table::ALL {
            if let Some(order) = table.order() {
                assert!(table.columns().contains(&order.column()));
            }
        }
    }

    #[test]
    fn test_row_ids_skip_missing() {
        let rows: Vec<Row> = [json!({"id": "a"}), json!({"title": "x"}), json!({"id": "b"})]
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        assert_eq!(row_ids(&rows), vec!["a", "b"]);
    }
}
