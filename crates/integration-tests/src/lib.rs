//! Integration tests for the TechFix-IT site.
//!
//! Each test builds the full router over an in-memory store, an in-memory
//! session store and a temporary upload directory, then drives it with
//! `tower::ServiceExt::oneshot`. No database or network is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p techfix-integration-tests
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use techfix_site::config::SiteConfig;
use techfix_site::db::{Database, InMemoryDatabase};
use techfix_site::middleware::{SESSION_COOKIE_NAME, configure_session_layer};
use techfix_site::services::{
    AuthService, ContactMessage, LocalObjectStore, MailError, MailRelay,
};
use techfix_site::state::AppState;

/// Admin account most tests log in with.
pub const ADMIN_EMAIL: &str = "admin@techfixit.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery";

/// A router wired to in-memory collaborators.
pub struct TestApp {
    router: Router,
    pub db: Arc<InMemoryDatabase>,
    pub upload_dir: TempDir,
}

impl TestApp {
    /// An app with no mail relay configured.
    pub fn new() -> Self {
        Self::with_mailer(None)
    }

    pub fn with_mailer(mailer: Option<Arc<dyn MailRelay>>) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

        let mut config = SiteConfig::with_defaults(SecretString::from("postgres://unused"));
        config.upload_dir = upload_dir.path().to_path_buf();

        let db = Arc::new(InMemoryDatabase::new());
        let session_layer = configure_session_layer(MemoryStore::default(), &config);
        let state = AppState::new(
            config,
            Arc::clone(&db) as Arc<dyn Database>,
            Arc::new(LocalObjectStore::new(upload_dir.path())),
            mailer,
        );

        Self {
            router: techfix_site::build_router(state, session_layer),
            db,
            upload_dir,
        }
    }

    /// Send one request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("valid request"))
            .await
    }

    pub async fn post_json(&self, path: &str, body: &Value, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(path).header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(
            builder
                .body(Body::from(body.to_string()))
                .expect("valid request"),
        )
        .await
    }

    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_owned())).expect("valid request"))
            .await
    }

    /// Create the default admin account.
    pub async fn create_admin(&self) {
        AuthService::new(self.db.as_ref())
            .create_admin(ADMIN_EMAIL, "Site Admin", ADMIN_PASSWORD)
            .await
            .expect("Failed to create admin");
    }

    /// Create the default admin, log in, and return the `Cookie` header value.
    pub async fn login(&self) -> String {
        self.create_admin().await;
        let response = self
            .post_form(
                "/auth/login",
                &form_body(&[("email", ADMIN_EMAIL), ("password", ADMIN_PASSWORD)]),
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), Some("/admin"));
        session_cookie(&response).expect("login sets a session cookie")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// URL-encode form fields. Only spaces, `@` and `&` need escaping here.
#[must_use]
pub fn form_body(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(name, value)| {
            let value = value
                .replace('%', "%25")
                .replace(' ', "+")
                .replace('@', "%40")
                .replace('&', "%26");
            format!("{name}={value}")
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// The `name=value` pair of the session cookie set by `response`, if any.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_owned)
}

#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Body is not JSON")
}

/// Mail relay that records messages instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<ContactMessage>>,
    unreachable: bool,
}

impl RecordingMailer {
    /// A relay whose every send fails with a connection error.
    #[must_use]
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sent(&self) -> Vec<ContactMessage> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }
}

#[async_trait]
impl MailRelay for RecordingMailer {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        if self.unreachable {
            return Err(MailError::Connection("connection refused".into()));
        }
        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(message.clone());
        Ok(())
    }
}
