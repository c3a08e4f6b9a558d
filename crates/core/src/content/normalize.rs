//! Schema normalizer.
//!
//! Rows come out of the store as JSON maps with snake_case column names.
//! The inbound functions turn them into entities without ever failing:
//! missing or mistyped fields become their defaults. For the columns the
//! editors historically sent in camelCase, a row may carry both spellings;
//! the snake_case column is authoritative.
//!
//! The outbound functions build the row written for an entity. Services
//! take their `display_order` from the position they were submitted at.

use serde_json::{Map, Value};

use super::entities::{LegalPage, PricingPlan, Service, Testimonial};

/// A store row: column name to JSON value.
pub type Row = Map<String, Value>;

/// Looks up `snake`, then `camel`. Nulls count as absent.
fn pick<'a>(row: &'a Row, snake: &str, camel: &str) -> Option<&'a Value> {
    field(row, snake).or_else(|| field(row, camel))
}

fn field<'a>(row: &'a Row, name: &str) -> Option<&'a Value> {
    row.get(name).filter(|value| !value.is_null())
}

fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn optional_text(value: Option<&Value>) -> Option<String> {
    Some(text(value)).filter(|s| !s.is_empty())
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    }
}

fn integer(value: Option<&Value>) -> i32 {
    let wide = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    wide.map_or(0, |n| {
        i32::try_from(n).unwrap_or(if n < 0 { i32::MIN } else { i32::MAX })
    })
}

/// Reads an ordered list of strings. A JSON-encoded string is accepted
/// for rows written before `features` became a `jsonb` column.
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| text(Some(item)))
            .collect(),
        Some(Value::String(s)) => serde_json::from_str::<Vec<String>>(s).unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn optional_value(value: Option<&String>) -> Value {
    value
        .filter(|s| !s.is_empty())
        .map_or(Value::Null, |s| Value::String(s.clone()))
}

fn list_value(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Inbound: a `services` row to a [`Service`].
#[must_use]
pub fn service_from_row(row: &Row) -> Service {
    Service {
        id: text(field(row, "id")),
        slug: text(field(row, "slug")),
        title: text(field(row, "title")),
        short_description: text(pick(row, "short_description", "shortDescription")),
        full_description: text(pick(row, "full_description", "fullDescription")),
        icon: text(field(row, "icon")),
        is_exclusive: flag(pick(row, "is_exclusive", "isExclusive")),
        features: string_list(field(row, "features")),
        image_url: optional_text(pick(row, "image_url", "imageUrl")),
        display_order: integer(field(row, "display_order")),
    }
}

/// Outbound: the `services` row for `service` submitted at `position`.
#[must_use]
pub fn service_to_row(service: &Service, position: usize) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), service.id.clone().into());
    row.insert("slug".into(), service.slug.clone().into());
    row.insert("title".into(), service.title.clone().into());
    row.insert(
        "short_description".into(),
        service.short_description.clone().into(),
    );
    row.insert(
        "full_description".into(),
        service.full_description.clone().into(),
    );
    row.insert("icon".into(), service.icon.clone().into());
    row.insert("is_exclusive".into(), service.is_exclusive.into());
    row.insert("features".into(), list_value(&service.features));
    row.insert(
        "display_order".into(),
        i32::try_from(position).unwrap_or(i32::MAX).into(),
    );
    row.insert(
        "image_url".into(),
        optional_value(service.image_url.as_ref()),
    );
    row
}

/// Inbound: a `pricing_plans` row to a [`PricingPlan`].
#[must_use]
pub fn pricing_plan_from_row(row: &Row) -> PricingPlan {
    PricingPlan {
        id: text(field(row, "id")),
        slug: text(field(row, "slug")),
        name: text(field(row, "name")),
        price: text(field(row, "price")),
        period: text(field(row, "period")),
        description: text(field(row, "description")),
        benefits_description: optional_text(field(row, "benefits_description")),
        features: string_list(field(row, "features")),
        is_popular: flag(pick(row, "is_popular", "isPopular")),
        featured: flag(field(row, "featured")),
        cta: text(field(row, "cta")),
    }
}

/// Outbound: the `pricing_plans` row for `plan`.
#[must_use]
pub fn pricing_plan_to_row(plan: &PricingPlan) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), plan.id.clone().into());
    row.insert("slug".into(), plan.slug.clone().into());
    row.insert("name".into(), plan.name.clone().into());
    row.insert("price".into(), plan.price.clone().into());
    row.insert("period".into(), plan.period.clone().into());
    row.insert("description".into(), plan.description.clone().into());
    row.insert(
        "benefits_description".into(),
        optional_value(plan.benefits_description.as_ref()),
    );
    row.insert("features".into(), list_value(&plan.features));
    row.insert("is_popular".into(), plan.is_popular.into());
    row.insert("featured".into(), plan.featured.into());
    row.insert("cta".into(), plan.cta.clone().into());
    row
}

/// Inbound: a `testimonials` row. Names already match.
#[must_use]
pub fn testimonial_from_row(row: &Row) -> Testimonial {
    Testimonial {
        id: text(field(row, "id")),
        author_name: text(field(row, "author_name")),
        author_role: text(field(row, "author_role")),
        content: text(field(row, "content")),
        rating: integer(field(row, "rating")),
        avatar_url: optional_text(field(row, "avatar_url")),
    }
}

/// Outbound: the `testimonials` row for `testimonial`.
#[must_use]
pub fn testimonial_to_row(testimonial: &Testimonial) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), testimonial.id.clone().into());
    row.insert("author_name".into(), testimonial.author_name.clone().into());
    row.insert("author_role".into(), testimonial.author_role.clone().into());
    row.insert("content".into(), testimonial.content.clone().into());
    row.insert("rating".into(), testimonial.rating.into());
    row.insert(
        "avatar_url".into(),
        optional_value(testimonial.avatar_url.as_ref()),
    );
    row
}

/// Inbound: a `legal_pages` row. Rows with a slug outside the fixed set
/// are skipped.
#[must_use]
pub fn legal_page_from_row(row: &Row) -> Option<LegalPage> {
    let slug = text(field(row, "slug")).parse().ok()?;
    let last_updated = field(row, "last_updated")
        .and_then(Value::as_str)
        .and_then(|s| chrono::DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&chrono::Utc));
    Some(LegalPage {
        id: text(field(row, "id")),
        slug,
        title: text(field(row, "title")),
        content: text(field(row, "content")),
        last_updated,
    })
}

/// Outbound: the `legal_pages` row for `page`.
#[must_use]
pub fn legal_page_to_row(page: &LegalPage) -> Row {
    let mut row = Row::new();
    row.insert("id".into(), page.id.clone().into());
    row.insert("slug".into(), page.slug.as_str().into());
    row.insert("title".into(), page.title.clone().into());
    row.insert("content".into(), page.content.clone().into());
    row.insert(
        "last_updated".into(),
        page.last_updated
            .map_or(Value::Null, |ts| Value::String(ts.to_rfc3339())),
    );
    row
}
