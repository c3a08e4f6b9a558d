//! Collection entities as the forms and pages see them.
//!
//! `Service` and `PricingPlan` use camelCase on the wire for the fields the
//! admin editors have always sent that way; the remaining fields keep their
//! column names. Every field has a default so partially-filled editor rows
//! deserialize; the write path checks `id` separately.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{LegalSlug, ServiceIcon};

/// A managed-IT service offering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub short_description: String,
    pub full_description: String,
    /// Symbolic icon name as the editor entered it; see [`Service::resolved_icon`].
    pub icon: String,
    pub is_exclusive: bool,
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Listing position, reassigned from array position on every save.
    #[serde(rename = "display_order")]
    pub display_order: i32,
}

impl Service {
    /// The icon to draw. Names outside the supported set render as
    /// [`ServiceIcon::HelpCircle`].
    #[must_use]
    pub fn resolved_icon(&self) -> ServiceIcon {
        ServiceIcon::from_name(&self.icon)
    }
}

/// A pricing plan. `price` and `period` are display strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingPlan {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub price: String,
    pub period: String,
    pub description: String,
    #[serde(
        rename = "benefits_description",
        skip_serializing_if = "Option::is_none"
    )]
    pub benefits_description: Option<String>,
    pub features: Vec<String>,
    /// Shows the "Most Popular" badge.
    pub is_popular: bool,
    /// Listed on the home page.
    pub featured: bool,
    pub cta: String,
}

impl PricingPlan {
    /// Number of features shown on a home page card.
    pub const PREVIEW_FEATURES: usize = 4;

    /// The features shown on a home page card.
    #[must_use]
    pub fn preview_features(&self) -> &[String] {
        self.features
            .get(..Self::PREVIEW_FEATURES)
            .unwrap_or(self.features.as_slice())
    }

    /// How many features the home page card leaves out.
    #[must_use]
    pub fn hidden_feature_count(&self) -> usize {
        self.features.len().saturating_sub(Self::PREVIEW_FEATURES)
    }
}

/// A customer testimonial. Field names match the columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub id: String,
    pub author_name: String,
    pub author_role: String,
    pub content: String,
    /// Intended 1-5, not enforced.
    pub rating: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Testimonial {
    /// Number of stars to draw, clamped to the 0-5 range.
    #[must_use]
    pub fn stars(&self) -> usize {
        usize::try_from(self.rating.clamp(0, 5)).unwrap_or(0)
    }

    /// First letter of the author's name, for the avatar placeholder.
    #[must_use]
    pub fn initial(&self) -> String {
        self.author_name
            .trim()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

/// A legal page. `content` is markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalPage {
    pub id: String,
    pub slug: LegalSlug,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl LegalPage {
    /// An empty page for `slug`, used when seeding and as a render fallback.
    #[must_use]
    pub fn placeholder(slug: LegalSlug) -> Self {
        Self {
            id: slug.as_str().to_owned(),
            slug,
            title: slug.default_title().to_owned(),
            content: String::new(),
            last_updated: None,
        }
    }
}
