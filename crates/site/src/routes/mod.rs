//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About page
//! GET  /services               - Service listing
//! GET  /services/{slug}        - Service detail
//! GET  /pricing                - Pricing plans
//! GET  /pricing/{slug}         - Pricing plan detail
//! GET  /contact                - Contact page
//! GET  /privacy                - Privacy policy (markdown)
//! GET  /terms                  - Terms of service (markdown)
//! GET  /health                 - Liveness
//! GET  /health/ready           - Store ping
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (rate limited)
//! POST /auth/logout            - Logout action
//!
//! # Admin (requires session)
//! GET  /admin                  - Dashboard
//! GET  /admin/profile          - Password change form
//! POST /admin/profile          - Password change action
//! GET  /admin/{editor}         - JSON editor for one content kind
//!
//! # API
//! GET  /api/content/{type}     - Read a content kind
//! POST /api/content/{type}     - Replace a content kind (requires session)
//! POST /api/upload             - Store an image, returns its URL
//! POST /api/contact            - Relay a contact message (rate limited)
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod contact;
pub mod health;
pub mod home;
pub mod pages;
pub mod pricing;
pub mod services;

use axum::{
    Router,
    routing::{get, post},
};
use chrono::Datelike;
use techfix_core::{FooterContent, LegalSlug};

use crate::middleware::login_rate_limiter;
use crate::services::ContentReader;
use crate::state::AppState;

/// Header and footer data every public page renders.
#[derive(Debug, Clone)]
pub struct SiteChrome {
    pub footer: FooterContent,
    pub copyright: String,
    pub legal_links: Vec<LegalLink>,
}

/// A footer link to one of the legal pages.
#[derive(Debug, Clone)]
pub struct LegalLink {
    pub title: &'static str,
    pub href: &'static str,
}

impl SiteChrome {
    /// Load the footer document. Never fails; missing fields use defaults.
    pub async fn load(content: &ContentReader<'_>) -> Self {
        let footer = content.footer().await;
        let copyright = footer.copyright_text(chrono::Utc::now().year());
        let legal_links = LegalSlug::ALL
            .into_iter()
            .map(|slug| LegalLink {
                title: slug.default_title(),
                href: slug.path(),
            })
            .collect();

        Self {
            footer,
            copyright,
            legal_links,
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/login",
            get(auth::login_page).merge(post(auth::login).layer(login_rate_limiter())),
        )
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(admin::dashboard))
        .route(
            "/profile",
            get(admin::profile_page).post(admin::change_password),
        )
        .route("/{editor}", get(admin::editor))
}

/// Create the service routes router.
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(services::index))
        .route("/{slug}", get(services::show))
}

/// Create the pricing routes router.
pub fn pricing_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(pricing::index))
        .route("/{slug}", get(pricing::show))
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Public pages
        .route("/", get(home::home))
        .route("/about", get(pages::about))
        .route("/contact", get(contact::contact_page))
        .route("/privacy", get(pages::privacy))
        .route("/terms", get(pages::terms))
        .nest("/services", service_routes())
        .nest("/pricing", pricing_routes())
        // Health
        .route("/health", get(health::health))
        .route("/health/ready", get(health::ready))
        // Auth and admin
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        // JSON API
        .nest("/api", api::routes())
}
