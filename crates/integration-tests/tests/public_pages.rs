//! Server-rendered public pages, health checks and response headers.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use serde_json::{Value, json};

use techfix_integration_tests::{TestApp, body_text};

async fn seed(app: &TestApp) {
    let cookie = app.login().await;

    let services = json!([
        {
            "id": "svc-security",
            "slug": "cyber-security",
            "title": "Cyber Security",
            "shortDescription": "Protect every endpoint.",
            "fullDescription": "Threat monitoring.\n\nIncident response.",
            "icon": "ShieldCheck",
            "isExclusive": true,
            "features": ["Firewall management", "Phishing drills"],
        },
        {
            "id": "svc-cloud",
            "slug": "cloud-backup",
            "title": "Cloud Backup",
            "icon": "NoSuchIcon",
        },
    ]);
    let plans = json!([
        {
            "id": "plan-pro",
            "slug": "business-pro",
            "name": "Business Pro",
            "price": "€299",
            "period": "/month",
            "features": ["One", "Two", "Three", "Four", "Five", "Six"],
            "isPopular": true,
            "featured": true,
            "cta": "Choose Pro",
        },
        {
            "id": "plan-basic",
            "slug": "basic",
            "name": "Basic",
            "price": "€99",
            "benefits_description": "Simple and steady.",
            "featured": false,
        },
    ]);
    let testimonials = json!([
        {"id": "t1", "author_name": "Niamh Byrne", "author_role": "Office Manager", "content": "Fast and friendly.", "rating": 9},
    ]);

    for (kind, body) in [
        ("services", services),
        ("pricing_plans", plans),
        ("testimonials", testimonials),
    ] {
        let response = app
            .post_json(&format!("/api/content/{kind}"), &body, Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::OK, "{kind}");
    }
}

async fn page(app: &TestApp, path: &str) -> String {
    let response = app.get(path, None).await;
    assert_eq!(response.status(), StatusCode::OK, "{path}");
    body_text(response).await
}

#[tokio::test]
async fn test_home_renders_defaults_on_fresh_install() {
    let app = TestApp::new();
    let html = page(&app, "/").await;

    assert!(html.contains(r#"<span class="hero__highlight">innovation</span>"#));
    assert!(html.contains("Discover More"));
    assert!(html.contains("info@techfixit.com"));
    assert!(html.contains("tel:+353433350737"));
    assert!(html.contains("TechFix It. All rights reserved."));
}

#[tokio::test]
async fn test_home_lists_content() {
    let app = TestApp::new();
    seed(&app).await;
    let html = page(&app, "/").await;

    assert!(html.contains("Cyber Security"));
    assert!(html.contains("EXCLUSIVE"));
    assert!(html.contains("icons.svg#shield-check"));
    // Unknown icon names fall back to the help symbol but are stored as entered.
    assert!(html.contains("icons.svg#help-circle"));
    let stored = body_text(app.get("/api/content/services", None).await).await;
    assert!(stored.contains("\"icon\":\"NoSuchIcon\""));

    // Only featured plans, first four features.
    assert!(html.contains("Business Pro"));
    assert!(html.contains("+ 2 more features"));
    assert!(!html.contains(">Five<"));
    assert!(html.contains("/contact?plan=Business%20Pro"));

    assert!(html.contains("Fast and friendly."));
    assert_eq!(html.matches(r#"class="star""#).count(), 5);
}

#[tokio::test]
async fn test_service_detail() {
    let app = TestApp::new();
    seed(&app).await;

    let html = page(&app, "/services/cyber-security").await;
    assert!(html.contains("<p>Threat monitoring.</p>"));
    assert!(html.contains("<p>Incident response.</p>"));
    assert!(html.contains("Phishing drills"));
    assert!(html.contains("/services/cloud-backup"));

    let response = app.get("/services/not-a-service", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pricing_pages() {
    let app = TestApp::new();
    seed(&app).await;

    let html = page(&app, "/pricing").await;
    let basic = html.find("/pricing/basic").unwrap();
    let pro = html.find("/pricing/business-pro").unwrap();
    // Prices sort as text: "€299" before "€99".
    assert!(pro < basic);

    let html = page(&app, "/pricing/business-pro").await;
    assert!(html.contains("Everything included in the Business Pro"));
    assert!(html.contains("without the overhead of an internal team"));

    let html = page(&app, "/pricing/basic").await;
    assert!(html.contains("Simple and steady."));

    let response = app.get("/pricing/enterprise", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_contact_page() {
    let app = TestApp::new();

    let html = page(&app, "/contact?plan=Business%20Pro").await;
    assert!(html.contains(r#"value="Get Started with Business Pro""#));
    // Footer details stand in for an empty contact document.
    assert!(html.contains("mailto:info@techfixit.com"));

    let cookie = app.login().await;
    let contact: Value = json!({
        "emails": ["sales@techfixit.com", "support@techfixit.com"],
        "phones": ["+353 1 555 0100"],
    });
    app.post_json("/api/content/contact_page", &contact, Some(&cookie))
        .await;

    let html = page(&app, "/contact").await;
    assert!(html.contains("support@techfixit.com"));
    assert!(html.contains("tel:+35315550100"));
    assert!(html.contains(r#"value="""#));
}

#[tokio::test]
async fn test_about_page_uses_saved_document() {
    let app = TestApp::new();
    let cookie = app.login().await;
    app.post_json(
        "/api/content/about_page",
        &json!({"heading": "Twenty years of uptime", "stats_number": "20+"}),
        Some(&cookie),
    )
    .await;

    let html = page(&app, "/about").await;
    assert!(html.contains("Twenty years of uptime"));
    assert!(html.contains("20+"));
    // Fields left out keep their defaults.
    assert!(html.contains("Years Experience"));
}

#[tokio::test]
async fn test_legal_pages() {
    let app = TestApp::new();

    let html = page(&app, "/privacy").await;
    assert!(html.contains("Privacy Policy"));
    assert!(html.contains("No content defined yet."));

    let cookie = app.login().await;
    let pages = json!([{
        "id": "privacy",
        "slug": "privacy-policy",
        "title": "Privacy Policy",
        "content": "## Data we keep\n\n<script>alert(1)</script>",
    }]);
    app.post_json("/api/content/legal_pages", &pages, Some(&cookie))
        .await;

    let html = page(&app, "/privacy").await;
    assert!(html.contains("<h2>Data we keep</h2>"));
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("Last updated"));
}

#[tokio::test]
async fn test_health_checks() {
    let app = TestApp::new();

    assert_eq!(page(&app, "/health").await, "ok");
    assert_eq!(page(&app, "/health/ready").await, r#"{"status":"ready"}"#);

    app.db.set_offline(true);
    let response = app.get("/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    // Public pages still render from defaults.
    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_static_assets() {
    let app = TestApp::new();

    let response = app.get("/", None).await;
    let csp = response
        .headers()
        .get(header::CONTENT_SECURITY_POLICY)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("script-src 'self'"));
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    assert!(response.headers().contains_key("x-request-id"));

    let response = app.get("/static/css/main.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = app.get("/static/images/icons.svg", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
