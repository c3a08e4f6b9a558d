//! Site configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SITE_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! ## Optional
//! - `SITE_HOST` - Bind address (default: 127.0.0.1)
//! - `SITE_PORT` - Listen port (default: 3000)
//! - `SITE_BASE_URL` - Public URL (default: `http://localhost:3000`)
//! - `UPLOAD_DIR` - Local upload directory served at `/uploads` (default: uploads)
//! - `STORAGE_URL`, `STORAGE_BUCKET`, `STORAGE_SERVICE_KEY` - Hosted upload bucket;
//!   all three must be set to use it
//! - `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS` - Mail relay for the contact form
//! - `SMTP_PORT` - Mail relay port (default: 26)
//! - `CONTACT_RECIPIENT` - Contact form destination (default: sales@techfix-it.ie)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Fraction of errors sent (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Fraction of transactions sent (default: 0.0)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

use techfix_core::Email;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default contact form destination.
pub const DEFAULT_CONTACT_RECIPIENT: &str = "sales@techfix-it.ie";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL
    pub base_url: Url,
    /// Where local uploads are written
    pub upload_dir: PathBuf,
    /// Hosted upload bucket, when configured
    pub storage: Option<StorageConfig>,
    /// Mail relay, when configured
    pub email: Option<EmailConfig>,
    /// Contact form destination
    pub contact_recipient: Email,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Hosted object storage for uploads.
///
/// Implements `Debug` manually to redact the service key.
#[derive(Clone)]
pub struct StorageConfig {
    /// Storage API root, e.g. `https://<project>.supabase.co/storage/v1`
    pub url: Url,
    pub bucket: String,
    pub service_key: SecretString,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &self.url.as_str())
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish()
    }
}

/// SMTP relay used by the contact form.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: SecretString,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_user", &self.smtp_user)
            .field("smtp_pass", &"[REDACTED]")
            .finish()
    }
}

impl SiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("SITE_DATABASE_URL")?;
        let host = get_env_or_default("SITE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SITE_HOST".to_string(), e.to_string()))?;
        let port = parse_port("SITE_PORT", &get_env_or_default("SITE_PORT", "3000"))?;
        let base_url = parse_url(
            "SITE_BASE_URL",
            &get_env_or_default("SITE_BASE_URL", "http://localhost:3000"),
        )?;
        let upload_dir = PathBuf::from(get_env_or_default("UPLOAD_DIR", "uploads"));
        let contact_recipient = Email::parse(&get_env_or_default(
            "CONTACT_RECIPIENT",
            DEFAULT_CONTACT_RECIPIENT,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("CONTACT_RECIPIENT".to_string(), e.to_string()))?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            upload_dir,
            storage: StorageConfig::from_env()?,
            email: EmailConfig::from_env()?,
            contact_recipient,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_rate(
                "SENTRY_SAMPLE_RATE",
                &get_env_or_default("SENTRY_SAMPLE_RATE", "1.0"),
            )?,
            sentry_traces_sample_rate: parse_rate(
                "SENTRY_TRACES_SAMPLE_RATE",
                &get_env_or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0"),
            )?,
        })
    }

    /// Configuration with every optional setting at its default.
    #[must_use]
    pub fn with_defaults(database_url: SecretString) -> Self {
        Self {
            database_url,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            base_url: Url::parse("http://localhost:3000")
                .unwrap_or_else(|_| unreachable!("literal URL is valid")),
            upload_dir: PathBuf::from("uploads"),
            storage: None,
            email: None,
            contact_recipient: Email::parse(DEFAULT_CONTACT_RECIPIENT)
                .unwrap_or_else(|_| unreachable!("literal email is valid")),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (session cookies get `Secure`).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }
}

impl StorageConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(url), Some(bucket)) = (
            get_optional_env("STORAGE_URL"),
            get_optional_env("STORAGE_BUCKET"),
        ) else {
            return Ok(None);
        };
        if get_optional_env("STORAGE_SERVICE_KEY").is_none() {
            return Ok(None);
        }

        Ok(Some(Self {
            url: parse_url("STORAGE_URL", url.trim_end_matches('/'))?,
            bucket,
            service_key: get_validated_secret("STORAGE_SERVICE_KEY")?,
        }))
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let (Some(smtp_host), Some(smtp_user)) =
            (get_optional_env("SMTP_HOST"), get_optional_env("SMTP_USER"))
        else {
            return Ok(None);
        };
        let Some(smtp_pass) = get_optional_env("SMTP_PASS") else {
            return Ok(None);
        };
        reject_placeholder(&smtp_pass, "SMTP_PASS")?;

        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_port("SMTP_PORT", &get_env_or_default("SMTP_PORT", "26"))?,
            smtp_user,
            smtp_pass: SecretString::from(smtp_pass),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sampling rate between 0.0 and 1.0.
fn parse_rate(key: &str, value: &str) -> Result<f32, ConfigError> {
    let rate = value
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("{rate} is outside 0.0..=1.0"),
        ));
    }
    Ok(rate)
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(value).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

fn reject_placeholder(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }
    Ok(())
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    reject_placeholder(secret, var_name)?;

    // Real API keys have high entropy
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated key."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-service-key-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_smtp_password_only_checked_for_placeholders() {
        assert!(reject_placeholder("hunter22", "SMTP_PASS").is_ok());
        assert!(reject_placeholder("CHANGEME", "SMTP_PASS").is_err());
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        assert!(parse_url("SITE_BASE_URL", "https://techfix-it.ie").is_ok());
        assert!(parse_url("SITE_BASE_URL", "ftp://techfix-it.ie").is_err());
        assert!(parse_url("SITE_BASE_URL", "not a url").is_err());
    }

    #[test]
    fn test_parse_rate_bounds() {
        assert!((parse_rate("R", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(parse_rate("R", "1.5").is_err());
        assert!(parse_rate("R", "often").is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port("SMTP_PORT", " 587 ").unwrap(), 587);
        assert!(parse_port("SMTP_PORT", "70000").is_err());
    }

    #[test]
    fn test_defaults_and_socket_addr() {
        let config = SiteConfig::with_defaults(SecretString::from("postgres://localhost/test"));
        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
        assert!(!config.is_secure());
        assert_eq!(config.contact_recipient.as_str(), DEFAULT_CONTACT_RECIPIENT);
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let storage = StorageConfig {
            url: Url::parse("https://project.supabase.co/storage/v1").unwrap(),
            bucket: "uploads".to_string(),
            service_key: SecretString::from("super_secret_service_key"),
        };
        let email = EmailConfig {
            smtp_host: "mail.techfix-it.ie".to_string(),
            smtp_port: 26,
            smtp_user: "web@techfix-it.ie".to_string(),
            smtp_pass: SecretString::from("super_secret_smtp_pass"),
        };

        let debug_output = format!("{storage:?} {email:?}");
        assert!(debug_output.contains("project.supabase.co"));
        assert!(debug_output.contains("mail.techfix-it.ie"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret"));
    }
}
