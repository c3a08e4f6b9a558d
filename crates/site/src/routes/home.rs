//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use techfix_core::{HeroContent, PricingPlan, Service, Testimonial};

use super::SiteChrome;
use crate::filters;
use crate::state::AppState;

/// Word of the hero title drawn with the accent colour.
const HERO_HIGHLIGHT: &str = "innovation";

/// Hero title split around the highlighted word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroTitle {
    pub before: String,
    pub highlight: Option<String>,
    pub after: String,
}

impl HeroTitle {
    /// Split `title` at the first occurrence of the highlight word.
    #[must_use]
    pub fn split(title: &str) -> Self {
        match title.split_once(HERO_HIGHLIGHT) {
            Some((before, after)) => Self {
                before: before.to_owned(),
                highlight: Some(HERO_HIGHLIGHT.to_owned()),
                after: after.to_owned(),
            },
            None => Self {
                before: title.to_owned(),
                highlight: None,
                after: String::new(),
            },
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub chrome: SiteChrome,
    pub hero: HeroContent,
    pub hero_title: HeroTitle,
    pub services: Vec<Service>,
    /// Plans flagged for the home page.
    pub featured_plans: Vec<PricingPlan>,
    pub testimonials: Vec<Testimonial>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let content = state.content();

    let hero = content.hero().await;
    let hero_title = HeroTitle::split(hero.title());
    let featured_plans = content
        .pricing_plans()
        .await
        .into_iter()
        .filter(|plan| plan.featured)
        .collect();

    HomeTemplate {
        chrome: SiteChrome::load(&content).await,
        hero_title,
        hero,
        services: content.services().await,
        featured_plans,
        testimonials: content.testimonials().await,
    }
}
