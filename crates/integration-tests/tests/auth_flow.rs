//! Login, logout, the admin session gate and password changes.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use techfix_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, body_text, form_body, location, session_cookie,
};

#[tokio::test]
async fn test_admin_pages_redirect_to_login() {
    let app = TestApp::new();

    for path in ["/admin", "/admin/services", "/admin/profile"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), Some("/auth/login"));
    }
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new();
    app.create_admin().await;

    let response = app
        .post_form(
            "/auth/login",
            &form_body(&[("email", ADMIN_EMAIL), ("password", "not the password")]),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login?error=credentials"));

    let page = body_text(app.get("/auth/login?error=credentials", None).await).await;
    assert!(page.contains("Invalid email or password."));
}

#[tokio::test]
async fn test_login_opens_admin_area() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Welcome, Site Admin"));

    let response = app.get("/admin/pricing", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"data-kind="pricing_plans""#));

    let response = app.get("/admin/nonexistent", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/auth/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn test_login_returns_to_requested_page() {
    let app = TestApp::new();
    app.create_admin().await;

    let response = app.get("/admin/testimonials", None).await;
    let cookie = session_cookie(&response).unwrap();

    let response = app
        .post_form(
            "/auth/login",
            &form_body(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)]),
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin/testimonials"));

    // The session id is cycled on login.
    let fresh = session_cookie(&response).unwrap();
    assert_ne!(fresh, cookie);
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app.post_form("/auth/logout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login?success=logged_out"));

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn test_change_password() {
    let app = TestApp::new();
    let cookie = app.login().await;

    let response = app
        .post_form(
            "/admin/profile",
            &form_body(&[
                ("current_password", ADMIN_PASSWORD),
                ("new_password", "a much better secret"),
                ("confirm_password", "something else"),
            ]),
            Some(&cookie),
        )
        .await;
    assert_eq!(location(&response), Some("/admin/profile?error=mismatch"));

    let response = app
        .post_form(
            "/admin/profile",
            &form_body(&[
                ("current_password", "wrong guess"),
                ("new_password", "a much better secret"),
                ("confirm_password", "a much better secret"),
            ]),
            Some(&cookie),
        )
        .await;
    assert_eq!(location(&response), Some("/admin/profile?error=current"));

    let response = app
        .post_form(
            "/admin/profile",
            &form_body(&[
                ("current_password", ADMIN_PASSWORD),
                ("new_password", "a much better secret"),
                ("confirm_password", "a much better secret"),
            ]),
            Some(&cookie),
        )
        .await;
    assert_eq!(location(&response), Some("/admin/profile?success=password"));

    let response = app
        .post_form(
            "/auth/login",
            &form_body(&[("email", ADMIN_EMAIL), ("password", "a much better secret")]),
            None,
        )
        .await;
    assert_eq!(location(&response), Some("/admin"));
}
