//! Admin account queries for [`PgDatabase`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use techfix_core::{AdminUserId, Email};

use super::{AdminUserStore, PgDatabase, RepositoryError};
use crate::models::{AdminCredentials, AdminUser};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i32,
    email: String,
    name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AdminUserRow> for AdminCredentials {
    type Error = RepositoryError;

    fn try_from(row: AdminUserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            user: AdminUser {
                id: AdminUserId::new(row.id),
                email,
                name: row.name,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        })
    }
}

#[async_trait]
impl AdminUserStore for PgDatabase {
    async fn find_admin_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM admin_users
            WHERE lower(email) = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool())
        .await?;

        row.map(AdminCredentials::try_from).transpose()
    }

    async fn find_admin_by_id(
        &self,
        id: AdminUserId,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            SELECT id, email, name, password_hash, created_at, updated_at
            FROM admin_users
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        row.map(AdminCredentials::try_from).transpose()
    }

    async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let row = sqlx::query_as::<_, AdminUserRow>(
            r"
            INSERT INTO admin_users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, name, password_hash, created_at, updated_at
            ",
        )
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        AdminCredentials::try_from(row).map(|credentials| credentials.user)
    }

    async fn update_admin_password(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE admin_users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(password_hash)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
