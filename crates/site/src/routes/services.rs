//! Service listing and detail handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use techfix_core::Service;

use super::SiteChrome;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Service listing template.
#[derive(Template, WebTemplate)]
#[template(path = "services/index.html")]
pub struct ServicesIndexTemplate {
    pub chrome: SiteChrome,
    pub services: Vec<Service>,
}

/// Service detail template.
#[derive(Template, WebTemplate)]
#[template(path = "services/show.html")]
pub struct ServiceShowTemplate {
    pub chrome: SiteChrome,
    pub service: Service,
    /// Every service, for the sidebar.
    pub all_services: Vec<Service>,
}

/// Display all services.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let content = state.content();
    ServicesIndexTemplate {
        chrome: SiteChrome::load(&content).await,
        services: content.services().await,
    }
}

/// Display one service.
///
/// # Errors
///
/// Returns 404 if no service has this slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let content = state.content();
    let service = content
        .service_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("service {slug}")))?;

    Ok(ServiceShowTemplate {
        chrome: SiteChrome::load(&content).await,
        service,
        all_services: content.services().await,
    })
}
