//! Email address type.
//!
//! Used for admin logins and for the reply-to address of contact
//! submissions. Parsing trims surrounding whitespace and lowercases the
//! address so that lookups against `admin_users.email` are stable.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty after trimming.
    #[error("email cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input does not contain exactly one @ symbol.
    #[error("email must contain exactly one @ symbol")]
    InvalidAtSymbol,
    /// The input contains whitespace or control characters.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// The local part (before @) or domain (after @) is empty.
    #[error("email must have a local part and a domain")]
    MissingPart,
}

/// A normalized email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters (RFC 5321 limit)
/// - Exactly one @ symbol with non-empty text on both sides
/// - No interior whitespace
///
/// ## Examples
///
/// ```
/// use techfix_core::Email;
///
/// let email = Email::parse("  Ops@TechFixIT.com ").unwrap();
/// assert_eq!(email.as_str(), "ops@techfixit.com");
///
/// assert!(Email::parse("no-at-symbol").is_err());
/// assert!(Email::parse("two@@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type), sqlx(transparent))]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse and normalize an `Email`.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first constraint the input
    /// violates.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(EmailError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailError::Whitespace);
        }

        let mut parts = trimmed.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(EmailError::InvalidAtSymbol);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(EmailError::MissingPart);
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the domain part of the email (after the @).
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let email = Email::parse("  Sales@TechFix-IT.ie\n").unwrap();
        assert_eq!(email.as_str(), "sales@techfix-it.ie");
        assert_eq!(email.domain(), "techfix-it.ie");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_parse_rejects_overlong() {
        let long = format!("{}@techfixit.com", "a".repeat(250));
        assert!(matches!(Email::parse(&long), Err(EmailError::TooLong { .. })));
    }

    #[test]
    fn test_parse_rejects_bad_at_symbols() {
        assert_eq!(Email::parse("nobody"), Err(EmailError::InvalidAtSymbol));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::InvalidAtSymbol));
        assert_eq!(Email::parse("@techfixit.com"), Err(EmailError::MissingPart));
        assert_eq!(Email::parse("info@"), Err(EmailError::MissingPart));
    }

    #[test]
    fn test_parse_rejects_interior_whitespace() {
        assert_eq!(
            Email::parse("info @techfixit.com"),
            Err(EmailError::Whitespace)
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"Info@TechFixIT.com\"").unwrap();
        assert_eq!(ok.to_string(), "info@techfixit.com");
        assert!(serde_json::from_str::<Email>("\"not-an-email\"").is_err());
    }
}
