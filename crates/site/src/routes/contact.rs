//! Contact page handler. Submissions go to `POST /api/contact`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::instrument;

use techfix_core::ContactDetails;

use super::SiteChrome;
use crate::filters;
use crate::state::AppState;

/// Query parameters for the contact page.
#[derive(Debug, Deserialize)]
pub struct ContactQuery {
    /// Set by a pricing plan's call-to-action.
    pub plan: Option<String>,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub chrome: SiteChrome,
    pub details: ContactDetails,
    /// Pre-filled subject line.
    pub subject: String,
}

/// Display the contact page.
#[instrument(skip(state))]
pub async fn contact_page(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> impl IntoResponse {
    let content = state.content();
    let chrome = SiteChrome::load(&content).await;
    let details = content.contact().await.resolve(&chrome.footer);
    let subject = query
        .plan
        .as_deref()
        .map(str::trim)
        .filter(|plan| !plan.is_empty())
        .map(|plan| format!("Get Started with {plan}"))
        .unwrap_or_default();

    ContactTemplate {
        chrome,
        details,
        subject,
    }
}
