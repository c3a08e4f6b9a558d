//! In-memory store for tests and local demos.
//!
//! Behaves like [`PgDatabase`](super::PgDatabase) for everything the site
//! relies on: upserts replace whole rows by `id`, reads honour the table's
//! listing order, and `replace_rows` applies upsert and prune under a single
//! lock. Setting the store offline makes every call fail the way an
//! unreachable database would.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use techfix_core::{AdminUserId, Email, Row};

use super::{
    AdminUserStore, ContentStore, RepositoryError, RowOrder, SiteSetting, Table, row_ids,
};
use crate::models::{AdminCredentials, AdminUser};

#[derive(Default)]
struct MemoryState {
    settings: HashMap<String, SiteSetting>,
    tables: HashMap<Table, Vec<Row>>,
    admins: Vec<AdminCredentials>,
}

/// A [`Database`](super::Database) held entirely in memory.
#[derive(Default)]
pub struct InMemoryDatabase {
    state: Mutex<MemoryState>,
    offline: AtomicBool,
}

impl InMemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    /// Raw rows of `table` in insertion order, without listing order applied.
    pub async fn raw_rows(&self, table: Table) -> Vec<Row> {
        self.state
            .lock()
            .await
            .tables
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }
}

fn sort_rows(rows: &mut [Row], order: RowOrder) {
    match order {
        RowOrder::Numeric(column) => {
            rows.sort_by_key(|row| row.get(column).and_then(Value::as_i64).unwrap_or(0));
        }
        RowOrder::Text(column) => {
            rows.sort_by(|a, b| {
                let a = a.get(column).and_then(Value::as_str).unwrap_or("");
                let b = b.get(column).and_then(Value::as_str).unwrap_or("");
                a.cmp(b)
            });
        }
    }
}

/// Mirrors Postgres, which refuses to upsert one id twice in a statement.
fn upsert_into(existing: &mut Vec<Row>, rows: &[Row]) -> Result<(), RepositoryError> {
    let mut seen = HashSet::with_capacity(rows.len());
    if let Some(id) = row_ids(rows).into_iter().find(|id| !seen.insert(id.clone())) {
        return Err(RepositoryError::Conflict(format!(
            "id '{id}' appears more than once in one upsert"
        )));
    }

    for row in rows {
        let id = row.get("id");
        match existing.iter_mut().find(|current| current.get("id") == id) {
            Some(current) => current.clone_from(row),
            None => existing.push(row.clone()),
        }
    }
    Ok(())
}

#[async_trait]
impl ContentStore for InMemoryDatabase {
    async fn fetch_setting(&self, key: &str) -> Result<Option<SiteSetting>, RepositoryError> {
        self.check_online()?;
        Ok(self.state.lock().await.settings.get(key).cloned())
    }

    async fn upsert_setting(
        &self,
        key: &str,
        data: &Value,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.state.lock().await.settings.insert(
            key.to_owned(),
            SiteSetting {
                key: key.to_owned(),
                data: data.clone(),
                updated_at,
            },
        );
        Ok(())
    }

    async fn select_rows(&self, table: Table) -> Result<Vec<Row>, RepositoryError> {
        self.check_online()?;
        let mut rows = self.raw_rows(table).await;
        if let Some(order) = table.order() {
            sort_rows(&mut rows, order);
        }
        Ok(rows)
    }

    async fn select_row_by(
        &self,
        table: Table,
        column: &'static str,
        value: &str,
    ) -> Result<Option<Row>, RepositoryError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state.tables.get(&table).and_then(|rows| {
            rows.iter()
                .find(|row| row.get(column).and_then(Value::as_str) == Some(value))
                .cloned()
        }))
    }

    async fn upsert_rows(&self, table: Table, rows: &[Row]) -> Result<(), RepositoryError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        upsert_into(state.tables.entry(table).or_default(), rows)?;
        Ok(())
    }

    async fn replace_rows(&self, table: Table, rows: &[Row]) -> Result<u64, RepositoryError> {
        self.check_online()?;
        let keep = row_ids(rows);
        let mut state = self.state.lock().await;
        let existing = state.tables.entry(table).or_default();
        upsert_into(existing, rows)?;

        let before = existing.len();
        existing.retain(|row| {
            row.get("id")
                .and_then(Value::as_str)
                .is_some_and(|id| keep.iter().any(|kept| kept == id))
        });
        Ok(u64::try_from(before - existing.len()).unwrap_or(u64::MAX))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_online()
    }
}

#[async_trait]
impl AdminUserStore for InMemoryDatabase {
    async fn find_admin_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state
            .admins
            .iter()
            .find(|admin| admin.user.email == *email)
            .cloned())
    }

    async fn find_admin_by_id(
        &self,
        id: AdminUserId,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        self.check_online()?;
        let state = self.state.lock().await;
        Ok(state.admins.iter().find(|admin| admin.user.id == id).cloned())
    }

    async fn create_admin(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        if state.admins.iter().any(|admin| admin.user.email == *email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let next_id = state
            .admins
            .iter()
            .map(|admin| admin.user.id.as_i32())
            .max()
            .unwrap_or(0)
            + 1;
        let now = Utc::now();
        let user = AdminUser {
            id: AdminUserId::new(next_id),
            email: email.clone(),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        state.admins.push(AdminCredentials {
            user: user.clone(),
            password_hash: password_hash.to_owned(),
        });
        Ok(user)
    }

    async fn update_admin_password(
        &self,
        id: AdminUserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        self.check_online()?;
        let mut state = self.state.lock().await;
        let admin = state
            .admins
            .iter_mut()
            .find(|admin| admin.user.id == id)
            .ok_or(RepositoryError::NotFound)?;
        password_hash.clone_into(&mut admin.password_hash);
        admin.user.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    #[tokio::test]
    async fn test_replace_rows_prunes_missing_ids() {
        let db = InMemoryDatabase::new();
        let rows: Vec<Row> = ["a", "b", "c"]
            .iter()
            .map(|id| row(json!({"id": id, "rating": 5})))
            .collect();
        db.replace_rows(Table::Testimonials, &rows).await.unwrap();

        let deleted = db
            .replace_rows(Table::Testimonials, &rows[..2])
            .await
            .unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(row_ids(&db.raw_rows(Table::Testimonials).await), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_repeated_id_in_one_batch_is_a_conflict() {
        let db = InMemoryDatabase::new();
        db.replace_rows(Table::Services, &[row(json!({"id": "keep"}))])
            .await
            .unwrap();

        let batch = [
            row(json!({"id": "a", "title": "First"})),
            row(json!({"id": "a", "title": "Second"})),
        ];
        assert!(matches!(
            db.replace_rows(Table::Services, &batch).await,
            Err(RepositoryError::Conflict(_))
        ));
        assert_eq!(row_ids(&db.raw_rows(Table::Services).await), vec!["keep"]);
    }

    #[tokio::test]
    async fn test_replace_with_nothing_empties_table() {
        let db = InMemoryDatabase::new();
        db.upsert_rows(Table::Services, &[row(json!({"id": "a"}))])
            .await
            .unwrap();
        assert_eq!(db.replace_rows(Table::Services, &[]).await.unwrap(), 1);
        assert!(db.select_rows(Table::Services).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_select_rows_applies_listing_order() {
        let db = InMemoryDatabase::new();
        db.upsert_rows(
            Table::PricingPlans,
            &[
                row(json!({"id": "a", "price": "$99"})),
                row(json!({"id": "b", "price": "$1,000"})),
                row(json!({"id": "c", "price": "$199"})),
            ],
        )
        .await
        .unwrap();
        let rows = db.select_rows(Table::PricingPlans).await.unwrap();
        assert_eq!(row_ids(&rows), vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_row() {
        let db = InMemoryDatabase::new();
        db.upsert_rows(
            Table::Testimonials,
            &[row(json!({"id": "a", "content": "old", "avatar_url": "/x.png"}))],
        )
        .await
        .unwrap();
        db.upsert_rows(Table::Testimonials, &[row(json!({"id": "a", "content": "new"}))])
            .await
            .unwrap();
        let stored = db
            .select_row_by(Table::Testimonials, "id", "a")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["content"], "new");
        assert!(!stored.contains_key("avatar_url"));
    }

    #[tokio::test]
    async fn test_offline_store_fails() {
        let db = InMemoryDatabase::new();
        db.set_offline(true);
        assert!(db.ping().await.is_err());
        assert!(db.fetch_setting("hero_section").await.is_err());
        db.set_offline(false);
        assert!(db.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_accounts() {
        let db = InMemoryDatabase::new();
        let email = Email::parse("ops@techfixit.com").unwrap();
        let admin = db.create_admin(&email, "Ops", "hash-1").await.unwrap();
        assert!(matches!(
            db.create_admin(&email, "Again", "hash-2").await,
            Err(RepositoryError::Conflict(_))
        ));

        db.update_admin_password(admin.id, "hash-3").await.unwrap();
        let found = db.find_admin_by_email(&email).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "hash-3");
        assert!(matches!(
            db.update_admin_password(AdminUserId::new(99), "x").await,
            Err(RepositoryError::NotFound)
        ));
    }
}
