//! Pricing plan handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::instrument;

use techfix_core::PricingPlan;

use super::SiteChrome;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Shown under "Why choose this plan?" when the plan has no text of its own.
pub const DEFAULT_BENEFITS: &str = "This plan is designed for businesses that need reliable, consistent IT support without the overhead of an internal team.";

/// Pricing listing template.
#[derive(Template, WebTemplate)]
#[template(path = "pricing/index.html")]
pub struct PricingIndexTemplate {
    pub chrome: SiteChrome,
    pub plans: Vec<PricingPlan>,
}

/// Pricing plan detail template.
#[derive(Template, WebTemplate)]
#[template(path = "pricing/show.html")]
pub struct PricingShowTemplate {
    pub chrome: SiteChrome,
    pub plan: PricingPlan,
    pub benefits: String,
    /// Every plan, for the sidebar.
    pub all_plans: Vec<PricingPlan>,
}

fn benefits_text(plan: &PricingPlan) -> String {
    plan.benefits_description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(DEFAULT_BENEFITS)
        .to_owned()
}

/// Display all pricing plans.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let content = state.content();
    PricingIndexTemplate {
        chrome: SiteChrome::load(&content).await,
        plans: content.pricing_plans().await,
    }
}

/// Display one pricing plan.
///
/// # Errors
///
/// Returns 404 if no plan has this slug.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let content = state.content();
    let plan = content
        .pricing_plan_by_slug(&slug)
        .await
        .ok_or_else(|| AppError::NotFound(format!("pricing plan {slug}")))?;

    Ok(PricingShowTemplate {
        chrome: SiteChrome::load(&content).await,
        benefits: benefits_text(&plan),
        plan,
        all_plans: content.pricing_plans().await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benefits_default_when_blank() {
        let mut plan = PricingPlan::default();
        assert_eq!(benefits_text(&plan), DEFAULT_BENEFITS);

        plan.benefits_description = Some("   ".into());
        assert_eq!(benefits_text(&plan), DEFAULT_BENEFITS);

        plan.benefits_description = Some("Round-the-clock cover.".into());
        assert_eq!(benefits_text(&plan), "Round-the-clock cover.");
    }
}
