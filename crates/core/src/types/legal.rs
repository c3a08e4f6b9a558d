//! Legal page slugs.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The fixed set of legal pages the site publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalSlug {
    #[serde(rename = "privacy-policy")]
    PrivacyPolicy,
    #[serde(rename = "terms-of-service")]
    TermsOfService,
}

impl LegalSlug {
    pub const ALL: [Self; 2] = [Self::PrivacyPolicy, Self::TermsOfService];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "privacy-policy",
            Self::TermsOfService => "terms-of-service",
        }
    }

    /// Title shown when the page has not been written yet.
    #[must_use]
    pub const fn default_title(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "Privacy Policy",
            Self::TermsOfService => "Terms of Service",
        }
    }

    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "How we handle your data",
            Self::TermsOfService => "Agreement for IT Services",
        }
    }

    /// Public path the page is served from.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::PrivacyPolicy => "/privacy",
            Self::TermsOfService => "/terms",
        }
    }
}

impl fmt::Display for LegalSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LegalSlug {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slug| slug.as_str() == s)
            .ok_or_else(|| format!("unknown legal page slug: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_str() {
        for slug in LegalSlug::ALL {
            assert_eq!(slug.as_str().parse::<LegalSlug>().unwrap(), slug);
        }
        assert!("cookie-policy".parse::<LegalSlug>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&LegalSlug::TermsOfService).unwrap(),
            "\"terms-of-service\""
        );
    }
}
