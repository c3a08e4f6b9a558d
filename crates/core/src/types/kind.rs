//! Content kinds addressable through `/api/content/{type}`.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A content kind name that is not part of [`ContentKind`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown content kind: {0}")]
pub struct UnknownContentKind(pub String);

/// How a content kind is persisted and written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentShape {
    /// One JSON document in `site_content`, keyed by the kind name.
    Singleton,
    /// Rows in a dedicated table keyed by `id`.
    Collection {
        /// Whether a write deletes rows missing from the submission.
        prune: bool,
    },
}

/// Every content kind the site knows how to read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Services,
    PricingPlans,
    Testimonials,
    LegalPages,
    HeroSection,
    FooterContent,
    AboutPage,
    ContactPage,
}

impl ContentKind {
    /// All kinds, collections first.
    pub const ALL: [Self; 8] = [
        Self::Services,
        Self::PricingPlans,
        Self::Testimonials,
        Self::LegalPages,
        Self::HeroSection,
        Self::FooterContent,
        Self::AboutPage,
        Self::ContactPage,
    ];

    /// The wire name, which is also the `site_content.key` for singletons.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::PricingPlans => "pricing_plans",
            Self::Testimonials => "testimonials",
            Self::LegalPages => "legal_pages",
            Self::HeroSection => "hero_section",
            Self::FooterContent => "footer_content",
            Self::AboutPage => "about_page",
            Self::ContactPage => "contact_page",
        }
    }

    #[must_use]
    pub const fn shape(self) -> ContentShape {
        match self {
            Self::Services | Self::PricingPlans | Self::Testimonials => {
                ContentShape::Collection { prune: true }
            }
            // The set of legal slugs is fixed, so omitted pages are kept.
            Self::LegalPages => ContentShape::Collection { prune: false },
            Self::HeroSection | Self::FooterContent | Self::AboutPage | Self::ContactPage => {
                ContentShape::Singleton
            }
        }
    }

    #[must_use]
    pub const fn is_singleton(self) -> bool {
        matches!(self.shape(), ContentShape::Singleton)
    }

    /// Human-readable label used by the admin navigation.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::PricingPlans => "Pricing Plans",
            Self::Testimonials => "Testimonials",
            Self::LegalPages => "Legal Pages",
            Self::HeroSection => "Hero Section",
            Self::FooterContent => "Footer",
            Self::AboutPage => "About Us",
            Self::ContactPage => "Contact Info",
        }
    }

    /// Path segment of the admin editor for this kind.
    #[must_use]
    pub const fn admin_slug(self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::PricingPlans => "pricing",
            Self::Testimonials => "testimonials",
            Self::LegalPages => "legal",
            Self::HeroSection => "hero",
            Self::FooterContent => "footer",
            Self::AboutPage => "about",
            Self::ContactPage => "contact",
        }
    }

    /// Look up a kind by its admin editor path segment.
    #[must_use]
    pub fn from_admin_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.admin_slug() == slug)
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = UnknownContentKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownContentKind(s.to_owned()))
    }
}
