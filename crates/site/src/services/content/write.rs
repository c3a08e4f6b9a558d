//! Content write path.
//!
//! Singletons are validated against their document struct and stored
//! wholesale. Collections are the complete desired state: every submitted
//! row is upserted by `id` and every other row is deleted, in one store
//! transaction. Legal pages are upserted only and never pruned.

use std::collections::HashSet;

use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use techfix_core::normalize::{
    legal_page_to_row, pricing_plan_to_row, service_to_row, testimonial_to_row,
};
use techfix_core::{
    ContentKind, ContentShape, LegalPage, PricingPlan, Row, Service, SiteDocument, Testimonial,
};

use crate::db::{Database, RepositoryError, Table};
use crate::models::WriteCapability;

/// Errors from a content write.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The body does not fit the content kind.
    #[error("{0}")]
    Invalid(String),

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

/// What a successful write changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    pub deleted: u64,
}

/// Legal page bodies may be one page or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}

/// Applies content edits.
pub struct ContentWriter<'a> {
    db: &'a dyn Database,
}

impl<'a> ContentWriter<'a> {
    #[must_use]
    pub const fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    /// Replace the content of `kind` with `body`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Invalid` when the body does not match the
    /// kind (nothing is written), or `ContentError::Store` when the store
    /// fails (a collection sync leaves the table unchanged).
    pub async fn apply(
        &self,
        capability: &WriteCapability,
        kind: ContentKind,
        body: Value,
    ) -> Result<WriteSummary, ContentError> {
        let summary = match kind.shape() {
            ContentShape::Singleton => self.save_document(kind, body).await?,
            ContentShape::Collection { prune } => {
                let (table, rows) = collection_rows(kind, body)?;
                let written = rows.len();
                let deleted = if prune {
                    self.db.replace_rows(table, &rows).await?
                } else {
                    self.db.upsert_rows(table, &rows).await?;
                    0
                };
                WriteSummary { written, deleted }
            }
        };

        tracing::info!(
            kind = %kind,
            admin_id = %capability.admin_id(),
            admin = %capability.admin_email(),
            written = summary.written,
            deleted = summary.deleted,
            "Content saved"
        );
        Ok(summary)
    }

    async fn save_document(
        &self,
        kind: ContentKind,
        body: Value,
    ) -> Result<WriteSummary, ContentError> {
        let document =
            SiteDocument::from_json(kind, body).map_err(|e| ContentError::Invalid(e.to_string()))?;
        self.db
            .upsert_setting(kind.as_str(), &document.to_json(), Utc::now())
            .await?;
        Ok(WriteSummary {
            written: 1,
            deleted: 0,
        })
    }
}

/// Validate a collection body and map it to store rows.
fn collection_rows(kind: ContentKind, body: Value) -> Result<(Table, Vec<Row>), ContentError> {
    let table = Table::for_kind(kind)
        .ok_or_else(|| ContentError::Invalid(format!("{kind} is not a collection")))?;

    let rows: Vec<Row> = match kind {
        ContentKind::Services => parse_list::<Service>(kind, body)?
            .iter()
            .enumerate()
            .map(|(position, service)| service_to_row(service, position))
            .collect(),
        ContentKind::PricingPlans => parse_list::<PricingPlan>(kind, body)?
            .iter()
            .map(pricing_plan_to_row)
            .collect(),
        ContentKind::Testimonials => parse_list::<Testimonial>(kind, body)?
            .iter()
            .map(testimonial_to_row)
            .collect(),
        ContentKind::LegalPages => {
            let pages = serde_json::from_value::<OneOrMany<LegalPage>>(body)
                .map_err(|_| {
                    ContentError::Invalid(
                        "legal_pages expects a page or an array of pages, each with an id and a known slug"
                            .to_owned(),
                    )
                })?
                .into_vec();
            let now = Utc::now();
            pages
                .into_iter()
                .map(|page| {
                    require_id(kind, &page.id)?;
                    Ok(legal_page_to_row(&LegalPage {
                        last_updated: Some(now),
                        ..page
                    }))
                })
                .collect::<Result<_, ContentError>>()?
        }
        ContentKind::HeroSection
        | ContentKind::FooterContent
        | ContentKind::AboutPage
        | ContentKind::ContactPage => {
            return Err(ContentError::Invalid(format!("{kind} is not a collection")));
        }
    };

    reject_duplicate_ids(kind, &rows)?;
    Ok((table, rows))
}

trait HasId {
    fn id(&self) -> &str;
}

impl HasId for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for PricingPlan {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HasId for Testimonial {
    fn id(&self) -> &str {
        &self.id
    }
}

fn parse_list<T: DeserializeOwned + HasId>(
    kind: ContentKind,
    body: Value,
) -> Result<Vec<T>, ContentError> {
    if !body.is_array() {
        return Err(ContentError::Invalid(format!("{kind} expects an array")));
    }
    let items: Vec<T> = serde_json::from_value(body)
        .map_err(|e| ContentError::Invalid(format!("invalid {kind} item: {e}")))?;
    for item in &items {
        require_id(kind, item.id())?;
    }
    Ok(items)
}

fn require_id(kind: ContentKind, id: &str) -> Result<(), ContentError> {
    if id.trim().is_empty() {
        return Err(ContentError::Invalid(format!(
            "every {kind} item needs a non-empty id"
        )));
    }
    Ok(())
}

/// Each id may appear once per body; a single upsert statement cannot touch
/// the same row twice.
fn reject_duplicate_ids(kind: ContentKind, rows: &[Row]) -> Result<(), ContentError> {
    let mut seen = HashSet::with_capacity(rows.len());
    for id in rows.iter().filter_map(|row| row.get("id").and_then(Value::as_str)) {
        if !seen.insert(id) {
            return Err(ContentError::Invalid(format!("duplicate {kind} id '{id}'")));
        }
    }
    Ok(())
}
