//! Content API: reads, full-replace writes, and the session gate.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use techfix_core::Row;
use techfix_integration_tests::{TestApp, body_json, body_text};
use techfix_site::db::{ContentStore, Table};

fn service(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "slug": id,
        "title": title,
        "shortDescription": format!("{title} in short"),
        "icon": "Shield",
        "features": ["24/7 monitoring"],
    })
}

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .map(|items| items.iter().filter_map(|item| item["id"].as_str()).collect())
        .unwrap_or_default()
}

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

#[tokio::test]
async fn test_snake_case_column_wins_on_read() {
    let app = TestApp::new();
    app.db
        .upsert_rows(
            Table::Services,
            &[
                row(json!({"id": "a", "short_description": "from column"})),
                row(json!({
                    "id": "b",
                    "short_description": "authoritative",
                    "shortDescription": "stale",
                })),
            ],
        )
        .await
        .unwrap();

    let list = body_json(app.get("/api/content/services", None).await).await;
    assert_eq!(list[0]["shortDescription"], "from column");
    assert_eq!(list[1]["shortDescription"], "authoritative");
    assert!(list[0].get("short_description").is_none());
}

#[tokio::test]
async fn test_singleton_write_is_idempotent() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let hero = json!({"title": "Managed IT for Longford", "show_lottie": false});

    for _ in 0..2 {
        let response = app
            .post_json("/api/content/hero_section", &hero, Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true}));
    }

    let stored = body_json(app.get("/api/content/hero_section", None).await).await;
    assert_eq!(stored, hero);
}

#[tokio::test]
async fn test_collection_write_replaces_contents() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let all = json!([service("a", "Backup"), service("b", "Security"), service("c", "Cloud")]);
    let response = app.post_json("/api/content/services", &all, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let kept = json!([service("a", "Backup"), service("c", "Cloud")]);
    let response = app.post_json("/api/content/services", &kept, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let list = body_json(app.get("/api/content/services", None).await).await;
    assert_eq!(ids(&list), vec!["a", "c"]);
}

#[tokio::test]
async fn test_submitted_order_becomes_display_order() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let first = json!([service("a", "A"), service("b", "B"), service("c", "C")]);
    app.post_json("/api/content/services", &first, Some(&cookie))
        .await;

    let reordered = json!([service("b", "B"), service("a", "A"), service("c", "C")]);
    app.post_json("/api/content/services", &reordered, Some(&cookie))
        .await;

    let list = body_json(app.get("/api/content/services", None).await).await;
    assert_eq!(ids(&list), vec!["b", "a", "c"]);
    assert_eq!(list[0]["display_order"], 0);
    assert_eq!(list[2]["display_order"], 2);
}

#[tokio::test]
async fn test_empty_array_empties_collection() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let plans = json!([{"id": "p1", "slug": "basic", "name": "Basic", "price": "€99"}]);
    app.post_json("/api/content/pricing_plans", &plans, Some(&cookie))
        .await;
    app.post_json("/api/content/pricing_plans", &json!([]), Some(&cookie))
        .await;

    let list = body_json(app.get("/api/content/pricing_plans", None).await).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_unknown_kind_is_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.get("/api/content/bogus_type", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid type");

    let response = app
        .post_json("/api/content/bogus_type", &json!({"title": "x"}), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    for table in Table::ALL {
        assert!(app.db.raw_rows(table).await.is_empty());
    }
}

#[tokio::test]
async fn test_write_without_session_is_unauthorized() {
    let app = TestApp::new();
    let cookie = app.login().await;
    let original = json!([service("a", "Backup")]);
    app.post_json("/api/content/services", &original, Some(&cookie))
        .await;
    let before = body_text(app.get("/api/content/services", None).await).await;

    let response = app
        .post_json("/api/content/services", &json!([]), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .post_json("/api/content/about_page", &json!({"title": "Hijacked"}), None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let after = body_text(app.get("/api/content/services", None).await).await;
    assert_eq!(before, after);
    let about = body_json(app.get("/api/content/about_page", None).await).await;
    assert_eq!(about, json!({}));
}

#[tokio::test]
async fn test_legal_pages_are_never_pruned() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let both = json!([
        {"id": "privacy", "slug": "privacy-policy", "title": "Privacy Policy", "content": "# Privacy"},
        {"id": "terms", "slug": "terms-of-service", "title": "Terms of Service", "content": "# Terms"},
    ]);
    let response = app.post_json("/api/content/legal_pages", &both, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let one = json!([
        {"id": "privacy", "slug": "privacy-policy", "title": "Privacy Notice", "content": "Updated"},
    ]);
    app.post_json("/api/content/legal_pages", &one, Some(&cookie))
        .await;

    let list = body_json(app.get("/api/content/legal_pages", None).await).await;
    let mut slugs: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|page| page["slug"].as_str())
        .collect();
    slugs.sort_unstable();
    assert_eq!(slugs, vec!["privacy-policy", "terms-of-service"]);
    assert!(list.as_array().unwrap().iter().all(|page| !page["last_updated"].is_null()));
}

#[tokio::test]
async fn test_legal_page_accepts_single_object() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let page = json!({"id": "terms", "slug": "terms-of-service", "title": "Terms", "content": "Be nice."});
    let response = app.post_json("/api/content/legal_pages", &page, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(app.get("/terms", None).await).await;
    assert!(html.contains("Be nice."));
}

#[tokio::test]
async fn test_absent_singleton_reads_as_empty_document() {
    let app = TestApp::new();

    let response = app.get("/api/content/about_page", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({}));

    let response = app.get("/about", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Leading the Future of Technology with Strategic Support"));
}

#[tokio::test]
async fn test_invalid_bodies_are_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .post_json("/api/content/hero_section", &json!({"headline": "typo"}), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/content/services", &json!({"id": "a"}), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .post_json("/api/content/testimonials", &json!([{"author_name": "No Id"}]), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.db.raw_rows(Table::Testimonials).await.is_empty());
    let hero = body_json(app.get("/api/content/hero_section", None).await).await;
    assert_eq!(hero, json!({}));
}

#[tokio::test]
async fn test_repeated_id_is_rejected() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let existing = json!([service("keep", "Backup")]);
    app.post_json("/api/content/services", &existing, Some(&cookie)).await;

    let body = json!([
        {"id": "a", "title": "First"},
        {"id": "a", "slug": "a2", "title": "Second"},
    ]);
    let response = app.post_json("/api/content/services", &body, Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "duplicate services id 'a'");

    let list = body_json(app.get("/api/content/services", None).await).await;
    assert_eq!(ids(&list), vec!["keep"]);
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.db.set_offline(true);

    let response = app
        .post_json("/api/content/testimonials", &json!([{"id": "t1"}]), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].is_string());

    let response = app.get("/api/content/testimonials", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}
