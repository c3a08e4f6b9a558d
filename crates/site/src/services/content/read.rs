//! Content read façade.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use techfix_core::normalize::{
    legal_page_from_row, pricing_plan_from_row, service_from_row, testimonial_from_row,
};
use techfix_core::{
    AboutContent, ContactContent, ContentKind, FooterContent, HeroContent, LegalPage, LegalSlug,
    PricingPlan, Row, Service, Testimonial,
};

use crate::db::{Database, Table};

/// Reads site content. Every call is one store round-trip; nothing is cached.
pub struct ContentReader<'a> {
    db: &'a dyn Database,
}

impl<'a> ContentReader<'a> {
    #[must_use]
    pub const fn new(db: &'a dyn Database) -> Self {
        Self { db }
    }

    // =========================================================================
    // Singletons
    // =========================================================================

    /// The stored document for a singleton kind, or an empty object when
    /// nothing has been saved yet or the store is unreachable.
    pub async fn document(&self, kind: ContentKind) -> Value {
        match self.db.fetch_setting(kind.as_str()).await {
            Ok(Some(setting)) => setting.data,
            Ok(None) => Value::Object(Map::new()),
            Err(e) => {
                tracing::error!(kind = %kind, error = %e, "Failed to fetch site content");
                Value::Object(Map::new())
            }
        }
    }

    async fn typed<T: DeserializeOwned + Default>(&self, kind: ContentKind) -> T {
        let document = self.document(kind).await;
        serde_json::from_value(document).unwrap_or_else(|e| {
            tracing::warn!(kind = %kind, error = %e, "Stored document does not parse, using defaults");
            T::default()
        })
    }

    pub async fn hero(&self) -> HeroContent {
        self.typed(ContentKind::HeroSection).await
    }

    pub async fn footer(&self) -> FooterContent {
        self.typed(ContentKind::FooterContent).await
    }

    pub async fn about(&self) -> AboutContent {
        self.typed(ContentKind::AboutPage).await
    }

    pub async fn contact(&self) -> ContactContent {
        self.typed(ContentKind::ContactPage).await
    }

    // =========================================================================
    // Collections
    // =========================================================================

    async fn rows(&self, table: Table) -> Vec<Row> {
        self.db.select_rows(table).await.unwrap_or_else(|e| {
            tracing::error!(table = table.name(), error = %e, "Failed to fetch rows");
            Vec::new()
        })
    }

    async fn row_by_slug(&self, table: Table, slug: &str) -> Option<Row> {
        self.db
            .select_row_by(table, "slug", slug)
            .await
            .unwrap_or_else(|e| {
                tracing::error!(table = table.name(), slug, error = %e, "Failed to fetch row");
                None
            })
    }

    /// Services by `display_order`.
    pub async fn services(&self) -> Vec<Service> {
        self.rows(Table::Services)
            .await
            .iter()
            .map(service_from_row)
            .collect()
    }

    /// Pricing plans sorted by their `price` text.
    pub async fn pricing_plans(&self) -> Vec<PricingPlan> {
        self.rows(Table::PricingPlans)
            .await
            .iter()
            .map(pricing_plan_from_row)
            .collect()
    }

    pub async fn testimonials(&self) -> Vec<Testimonial> {
        self.rows(Table::Testimonials)
            .await
            .iter()
            .map(testimonial_from_row)
            .collect()
    }

    pub async fn legal_pages(&self) -> Vec<LegalPage> {
        self.rows(Table::LegalPages)
            .await
            .iter()
            .filter_map(legal_page_from_row)
            .collect()
    }

    pub async fn service_by_slug(&self, slug: &str) -> Option<Service> {
        self.row_by_slug(Table::Services, slug)
            .await
            .as_ref()
            .map(service_from_row)
    }

    pub async fn pricing_plan_by_slug(&self, slug: &str) -> Option<PricingPlan> {
        self.row_by_slug(Table::PricingPlans, slug)
            .await
            .as_ref()
            .map(pricing_plan_from_row)
    }

    pub async fn legal_page(&self, slug: LegalSlug) -> Option<LegalPage> {
        self.row_by_slug(Table::LegalPages, slug.as_str())
            .await
            .as_ref()
            .and_then(legal_page_from_row)
    }

    // =========================================================================
    // API
    // =========================================================================

    /// The JSON the content API returns for `kind`: the raw document for
    /// singletons, the normalized list for collections.
    pub async fn as_json(&self, kind: ContentKind) -> Value {
        let list = match kind {
            ContentKind::HeroSection
            | ContentKind::FooterContent
            | ContentKind::AboutPage
            | ContentKind::ContactPage => return self.document(kind).await,
            ContentKind::Services => serde_json::to_value(self.services().await),
            ContentKind::PricingPlans => serde_json::to_value(self.pricing_plans().await),
            ContentKind::Testimonials => serde_json::to_value(self.testimonials().await),
            ContentKind::LegalPages => serde_json::to_value(self.legal_pages().await),
        };
        list.unwrap_or_else(|e| {
            tracing::error!(kind = %kind, error = %e, "Failed to serialize content");
            Value::Array(Vec::new())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::db::{ContentStore, InMemoryDatabase};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => Row::new(),
        }
    }

    #[tokio::test]
    async fn test_missing_singleton_is_empty_object() {
        let db = InMemoryDatabase::new();
        let reader = ContentReader::new(&db);
        assert_eq!(reader.document(ContentKind::AboutPage).await, json!({}));
        assert_eq!(reader.about().await, AboutContent::default());
    }

    #[tokio::test]
    async fn test_store_failure_degrades_to_empty() {
        let db = InMemoryDatabase::new();
        db.set_offline(true);
        let reader = ContentReader::new(&db);
        assert_eq!(reader.document(ContentKind::HeroSection).await, json!({}));
        assert!(reader.services().await.is_empty());
        assert!(reader.pricing_plan_by_slug("basic").await.is_none());
        assert_eq!(reader.as_json(ContentKind::Testimonials).await, json!([]));
    }

    #[tokio::test]
    async fn test_unparseable_document_uses_defaults() {
        let db = InMemoryDatabase::new();
        db.upsert_setting("hero_section", &json!({"title": 42}), Utc::now())
            .await
            .unwrap();
        let hero = ContentReader::new(&db).hero().await;
        assert_eq!(hero, HeroContent::default());
    }

    #[tokio::test]
    async fn test_services_are_normalized_in_display_order() {
        let db = InMemoryDatabase::new();
        db.upsert_rows(
            Table::Services,
            &[
                row(json!({"id": "b", "slug": "backup", "display_order": 1, "short_description": "Snake", "shortDescription": "Camel"})),
                row(json!({"id": "a", "slug": "audit", "display_order": 0, "shortDescription": "Only camel"})),
            ],
        )
        .await
        .unwrap();

        let reader = ContentReader::new(&db);
        let services = reader.services().await;
        assert_eq!(services[0].id, "a");
        assert_eq!(services[0].short_description, "Only camel");
        assert_eq!(services[1].short_description, "Snake");

        let listed = reader.as_json(ContentKind::Services).await;
        assert_eq!(listed[1]["shortDescription"], "Snake");
        assert_eq!(reader.service_by_slug("backup").await.unwrap().id, "b");
        assert!(reader.service_by_slug("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_legal_page_lookup() {
        let db = InMemoryDatabase::new();
        db.upsert_rows(
            Table::LegalPages,
            &[row(json!({"id": "p1", "slug": "privacy-policy", "title": "Privacy", "content": "# Hi"}))],
        )
        .await
        .unwrap();
        let reader = ContentReader::new(&db);
        assert_eq!(
            reader.legal_page(LegalSlug::PrivacyPolicy).await.unwrap().id,
            "p1"
        );
        assert!(reader.legal_page(LegalSlug::TermsOfService).await.is_none());
    }
}
