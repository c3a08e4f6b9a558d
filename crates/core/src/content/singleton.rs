//! Singleton documents stored in `site_content`.
//!
//! Each document is a set of optional fields. An absent or blank field
//! renders with the built-in default, so a fresh install shows a complete
//! site before anything has been edited. Unknown fields are rejected when a
//! document is written.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::ContentKind;

/// Returns `value` unless it is missing or blank.
fn non_blank<'a>(value: Option<&'a str>, fallback: &'a str) -> &'a str {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback,
    }
}

/// Generates `&str` accessors that apply the built-in defaults.
macro_rules! text_fields {
    ($ty:ty { $($field:ident => $default:expr,)+ }) => {
        impl $ty {
            $(
                #[must_use]
                pub fn $field(&self) -> &str {
                    non_blank(self.$field.as_deref(), $default)
                }
            )+
        }
    };
}

/// Home page hero section (`hero_section`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeroContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_lottie: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_primary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_primary_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_secondary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_secondary_link: Option<String>,
}

text_fields!(HeroContent {
    title => "IT solutions that drive innovation and excellence in Ireland.",
    subtitle => "Specialized technical support and managed IT services designed to scale your business. Security, performance, and continuity where you need it most.",
    image_url => "/uploads/globo.gif",
    cta_primary_text => "Discover More",
    cta_primary_link => "/services",
    cta_secondary_text => "Contact Us",
    cta_secondary_link => "/contact",
});

impl HeroContent {
    /// Whether the animated illustration is shown. Defaults to on.
    #[must_use]
    pub fn show_lottie(&self) -> bool {
        self.show_lottie.unwrap_or(true)
    }

    #[must_use]
    pub fn background_image(&self) -> Option<&str> {
        self.background_image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }
}

/// Site-wide footer (`footer_content`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FooterContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_text: Option<String>,
}

text_fields!(FooterContent {
    company_description => "Innovative technology solutions for modern businesses.",
    address => "N4 Axis Centre, Battery Rd, Aghadegnan, Longford, N39 XW95, Irlanda",
    phone => "+353 43 335 0737",
    email => "info@techfixit.com",
});

impl FooterContent {
    /// The copyright line, defaulting to one stamped with `year`.
    #[must_use]
    pub fn copyright_text(&self, year: i32) -> String {
        match self.copyright_text.as_deref() {
            Some(text) if !text.trim().is_empty() => text.to_owned(),
            _ => format!("© {year} TechFix It. All rights reserved."),
        }
    }
}

/// About page (`about_page`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AboutContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
}

text_fields!(AboutContent {
    title => "About Us",
    subtitle => "Unleashing Innovation, Connecting Possibilities. Pioneering the Future of Technology.",
    stats_number => "18+",
    stats_label => "Years Experience",
    section_label => "Who We Are",
    heading => "Leading the Future of Technology with Strategic Support",
    paragraph1 => "With over 8 years of experience in the Irish market, TechFix It combines in-depth technical knowledge with personalized service. We're not just support; we're your infrastructure partner.",
    paragraph2 => "We've reduced downtime by up to 40% for our clients through proactive monitoring and state-of-the-art cloud solutions.",
    cta_text => "More About Us",
    cta_link => "/contact",
});

impl AboutContent {
    /// The section image, if one has been uploaded.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

/// Contact page details (`contact_page`).
///
/// Empty fields fall back to the footer's contact details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
}

/// Contact details after applying the footer fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDetails {
    pub address: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactContent {
    /// Merge with the footer, which supplies any blank field.
    #[must_use]
    pub fn resolve(&self, footer: &FooterContent) -> ContactDetails {
        fn filled(values: Option<&Vec<String>>, fallback: &str) -> Vec<String> {
            let list: Vec<String> = values
                .into_iter()
                .flatten()
                .filter(|value| !value.trim().is_empty())
                .cloned()
                .collect();
            if list.is_empty() {
                vec![fallback.to_owned()]
            } else {
                list
            }
        }

        ContactDetails {
            address: non_blank(self.address.as_deref(), footer.address()).to_owned(),
            emails: filled(self.emails.as_ref(), footer.email()),
            phones: filled(self.phones.as_ref(), footer.phone()),
        }
    }
}

/// Errors from validating a singleton write.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    /// The kind is a collection, not a singleton.
    #[error("{0} is not a singleton content kind")]
    NotSingleton(ContentKind),
    /// The body does not match the document's fields.
    #[error("invalid {kind} document: {source}")]
    Invalid {
        kind: ContentKind,
        #[source]
        source: serde_json::Error,
    },
}

/// A validated singleton document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteDocument {
    Hero(HeroContent),
    Footer(FooterContent),
    About(AboutContent),
    Contact(ContactContent),
}

impl SiteDocument {
    /// Validate a request body for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::NotSingleton`] for collection kinds and
    /// [`DocumentError::Invalid`] when the body has unknown fields or values
    /// of the wrong type.
    pub fn from_json(kind: ContentKind, body: Value) -> Result<Self, DocumentError> {
        let invalid = |source| DocumentError::Invalid { kind, source };
        match kind {
            ContentKind::HeroSection => serde_json::from_value(body).map(Self::Hero),
            ContentKind::FooterContent => serde_json::from_value(body).map(Self::Footer),
            ContentKind::AboutPage => serde_json::from_value(body).map(Self::About),
            ContentKind::ContactPage => serde_json::from_value(body).map(Self::Contact),
            ContentKind::Services
            | ContentKind::PricingPlans
            | ContentKind::Testimonials
            | ContentKind::LegalPages => return Err(DocumentError::NotSingleton(kind)),
        }
        .map_err(invalid)
    }

    #[must_use]
    pub const fn kind(&self) -> ContentKind {
        match self {
            Self::Hero(_) => ContentKind::HeroSection,
            Self::Footer(_) => ContentKind::FooterContent,
            Self::About(_) => ContentKind::AboutPage,
            Self::Contact(_) => ContentKind::ContactPage,
        }
    }

    /// The document as stored in `site_content.data`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let value = match self {
            Self::Hero(doc) => serde_json::to_value(doc),
            Self::Footer(doc) => serde_json::to_value(doc),
            Self::About(doc) => serde_json::to_value(doc),
            Self::Contact(doc) => serde_json::to_value(doc),
        };
        // Plain structs of strings, bools and lists always serialize.
        value.unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_hero_defaults_apply_to_blank_fields() {
        let hero = HeroContent {
            title: Some("   ".into()),
            subtitle: Some("Custom subtitle".into()),
            ..HeroContent::default()
        };
        assert_eq!(
            hero.title(),
            "IT solutions that drive innovation and excellence in Ireland."
        );
        assert_eq!(hero.subtitle(), "Custom subtitle");
        assert_eq!(hero.cta_primary_link(), "/services");
        assert!(hero.show_lottie());
        assert_eq!(hero.background_image(), None);
    }

    #[test]
    fn test_footer_copyright_uses_year() {
        let footer = FooterContent::default();
        assert_eq!(
            footer.copyright_text(2031),
            "© 2031 TechFix It. All rights reserved."
        );
        let custom = FooterContent {
            copyright_text: Some("© TechFix".into()),
            ..FooterContent::default()
        };
        assert_eq!(custom.copyright_text(2031), "© TechFix");
    }

    #[test]
    fn test_about_defaults() {
        let about = AboutContent::default();
        assert_eq!(about.title(), "About Us");
        assert_eq!(about.stats_number(), "18+");
        assert_eq!(about.cta_link(), "/contact");
    }

    #[test]
    fn test_contact_falls_back_to_footer() {
        let footer = FooterContent {
            phone: Some("+353 1 000 0000".into()),
            ..FooterContent::default()
        };
        let contact = ContactContent {
            emails: Some(vec!["support@techfixit.com".into(), String::new()]),
            ..ContactContent::default()
        };
        let details = contact.resolve(&footer);
        assert_eq!(details.address, footer.address());
        assert_eq!(details.emails, vec!["support@techfixit.com".to_owned()]);
        assert_eq!(details.phones, vec!["+353 1 000 0000".to_owned()]);
    }

    #[test]
    fn test_from_json_accepts_known_fields() {
        let doc = SiteDocument::from_json(
            ContentKind::HeroSection,
            json!({"title": "Hello", "show_lottie": false}),
        )
        .unwrap();
        assert_eq!(doc.kind(), ContentKind::HeroSection);
        assert_eq!(doc.to_json(), json!({"title": "Hello", "show_lottie": false}));
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = SiteDocument::from_json(ContentKind::FooterContent, json!({"fax": "123"}))
            .unwrap_err();
        assert!(matches!(err, DocumentError::Invalid { .. }));
        assert!(err.to_string().contains("fax"));
    }

    #[test]
    fn test_from_json_rejects_collections() {
        let err = SiteDocument::from_json(ContentKind::Services, json!([])).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::NotSingleton(ContentKind::Services)
        ));
    }

    #[test]
    fn test_empty_document_round_trips() {
        let doc = SiteDocument::from_json(ContentKind::AboutPage, json!({})).unwrap();
        assert_eq!(doc.to_json(), json!({}));
    }
}
