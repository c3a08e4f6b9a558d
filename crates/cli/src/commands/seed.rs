//! Seed the fixed legal pages.
//!
//! The footer links to `/privacy` and `/terms` unconditionally, so both
//! rows should exist from the first deploy. Existing pages are left alone.

use chrono::Utc;
use techfix_core::normalize::legal_page_to_row;
use techfix_core::{LegalPage, LegalSlug, Row};
use techfix_site::db::{ContentStore, PgDatabase, RepositoryError, Table};
use thiserror::Error;
use tracing::info;

use super::{ConnectError, connect};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Insert a placeholder page for every legal slug that has no row yet.
pub async fn legal_pages() -> Result<(), SeedError> {
    let db = PgDatabase::new(connect().await?);

    let mut missing = Vec::new();
    for slug in LegalSlug::ALL {
        if db
            .select_row_by(Table::LegalPages, "slug", slug.as_str())
            .await?
            .is_some()
        {
            info!(slug = slug.as_str(), "Legal page exists, skipping");
            continue;
        }
        missing.push(seed_row(slug));
    }

    if missing.is_empty() {
        info!("Nothing to seed");
        return Ok(());
    }

    db.upsert_rows(Table::LegalPages, &missing).await?;
    info!(inserted = missing.len(), "Legal pages seeded");
    Ok(())
}

fn seed_row(slug: LegalSlug) -> Row {
    legal_page_to_row(&LegalPage {
        last_updated: Some(Utc::now()),
        ..LegalPage::placeholder(slug)
    })
}
