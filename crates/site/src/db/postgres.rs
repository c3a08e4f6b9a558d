//! `PostgreSQL` content store.
//!
//! Collection rows travel as JSON in both directions: reads select
//! `to_jsonb(t)` and writes expand a JSON array with
//! `jsonb_populate_recordset`, so one code path serves every table.
//! Table and column names only ever come from [`Table`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgExecutor, PgPool, Row as _};

use techfix_core::Row;

use super::{ContentStore, RepositoryError, RowOrder, SiteSetting, Table, row_ids};

/// Content and admin-account store backed by a connection pool.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
}

impl PgDatabase {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for session storage and migrations.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(FromRow)]
struct SiteSettingRow {
    key: String,
    data: Value,
    updated_at: DateTime<Utc>,
}

impl From<SiteSettingRow> for SiteSetting {
    fn from(row: SiteSettingRow) -> Self {
        Self {
            key: row.key,
            data: row.data,
            updated_at: row.updated_at,
        }
    }
}

fn select_sql(table: Table) -> String {
    let order = match table.order() {
        Some(RowOrder::Numeric(column)) => format!(" ORDER BY t.{column} ASC"),
        Some(RowOrder::Text(column)) => format!(" ORDER BY t.{column} COLLATE \"C\" ASC"),
        None => String::new(),
    };
    format!("SELECT to_jsonb(t) AS row FROM {} t{order}", table.name())
}

fn upsert_sql(table: Table) -> String {
    let columns = table.columns();
    let list = columns.join(", ");
    let updates = columns
        .iter()
        .filter(|column| **column != "id")
        .map(|column| format!("{column} = EXCLUDED.{column}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {name} ({list}) \
         SELECT {list} FROM jsonb_populate_recordset(NULL::{name}, $1) \
         ON CONFLICT (id) DO UPDATE SET {updates}",
        name = table.name(),
    )
}

fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Row, RepositoryError> {
    match row.try_get::<Value, _>("row")? {
        Value::Object(map) => Ok(map),
        other => Err(RepositoryError::DataCorruption(format!(
            "expected a row object, got {other}"
        ))),
    }
}

async fn upsert_with<'e, E: PgExecutor<'e>>(
    executor: E,
    table: Table,
    rows: &[Row],
) -> Result<(), RepositoryError> {
    let payload = Value::Array(rows.iter().cloned().map(Value::Object).collect());
    sqlx::query(&upsert_sql(table))
        .bind(payload)
        .execute(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict(format!(
                    "{}: {}",
                    table.name(),
                    db_err.message()
                ));
            }
            RepositoryError::Database(e)
        })?;
    Ok(())
}

#[async_trait]
impl ContentStore for PgDatabase {
    async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, RepositoryError> {
        let row = sqlx::query_as::<_, SiteSettingRow>(
            "SELECT key, data, updated_at FROM site_content WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(SiteSetting::from))
    }

    async fn upsert_setting(
        &self,
        key: &str,
        data: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO site_content (key, data, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key) DO UPDATE
            SET data = EXCLUDED.data, updated_at = EXCLUDED.updated_at
            ",
        )
        .bind(key)
        .bind(data)
        .bind(updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn select_rows(&self, table: Table) -> Result<Vec<Row>, RepositoryError> {
        let rows = sqlx::query(&select_sql(table))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn select_row_by(
        &self,
        table: Table,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Row>, RepositoryError> {
        let sql = format!(
            "SELECT to_jsonb(t) AS row FROM {} t WHERE t.{column} = $1 LIMIT 1",
            table.name()
        );
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode_row).transpose()
    }

    async fn upsert_rows(&self, table: Table, rows: &[Row]) -> Result<(), RepositoryError> {
        if rows.is_empty() {
            return Ok(());
        }
        upsert_with(&self.pool, table, rows).await
    }

    async fn replace_rows(&self, table: Table, rows: &[Row]) -> Result<u64, RepositoryError> {
        let ids = row_ids(rows);
        let mut tx = self.pool.begin().await?;

        if !rows.is_empty() {
            upsert_with(&mut *tx, table, rows).await?;
        }

        // `id = ANY('{}')` is false for every row, so an empty list deletes all.
        let deleted = sqlx::query(&format!(
            "DELETE FROM {} WHERE NOT (id = ANY($1))",
            table.name()
        ))
        .bind(&ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_sql_orders_services_numerically() {
        assert_eq!(
            select_sql(Table::Services),
            "SELECT to_jsonb(t) AS row FROM services t ORDER BY t.display_order ASC"
        );
    }

    #[test]
    fn test_select_sql_orders_prices_as_bytes() {
        assert!(select_sql(Table::PricingPlans).ends_with("ORDER BY t.price COLLATE \"C\" ASC"));
        assert!(!select_sql(Table::Testimonials).contains("ORDER BY"));
    }

    #[test]
    fn test_upsert_sql_updates_every_non_key_column() {
        let sql = upsert_sql(Table::Testimonials);
        assert!(sql.starts_with(
            "INSERT INTO testimonials (id, author_name, author_role, content, rating, avatar_url)"
        ));
        assert!(sql.contains("jsonb_populate_recordset(NULL::testimonials, $1)"));
        assert!(sql.contains("rating = EXCLUDED.rating"));
        assert!(!sql.contains("id = EXCLUDED.id"));
    }
}
