//! About and legal page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use techfix_core::{AboutContent, LegalSlug};

use super::SiteChrome;
use crate::filters;
use crate::services::LegalPageView;
use crate::state::AppState;

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "about.html")]
pub struct AboutTemplate {
    pub chrome: SiteChrome,
    pub about: AboutContent,
}

/// Legal page template, shared by privacy and terms.
#[derive(Template, WebTemplate)]
#[template(path = "legal.html")]
pub struct LegalTemplate {
    pub chrome: SiteChrome,
    pub page: LegalPageView,
}

/// Display the About page.
#[instrument(skip(state))]
pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    let content = state.content();
    AboutTemplate {
        chrome: SiteChrome::load(&content).await,
        about: content.about().await,
    }
}

async fn legal(state: &AppState, slug: LegalSlug) -> LegalTemplate {
    let content = state.content();
    let page = content.legal_page(slug).await;
    LegalTemplate {
        chrome: SiteChrome::load(&content).await,
        page: LegalPageView::new(slug, page),
    }
}

/// Display the Privacy Policy.
#[instrument(skip(state))]
pub async fn privacy(State(state): State<AppState>) -> impl IntoResponse {
    legal(&state, LegalSlug::PrivacyPolicy).await
}

/// Display the Terms of Service.
#[instrument(skip(state))]
pub async fn terms(State(state): State<AppState>) -> impl IntoResponse {
    legal(&state, LegalSlug::TermsOfService).await
}
