//! Contact form mail relay.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and text templates.
//! The relay sits behind [`MailRelay`] so the contact endpoint can be
//! exercised without a mail server.

use askama::Template;
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;

use techfix_core::Email;

use crate::config::EmailConfig;

/// Display name on relayed messages.
const FROM_NAME: &str = "TechFix-IT Website";

/// HTML body of a relayed contact message.
#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmailHtml<'a> {
    message: &'a ContactMessage,
}

/// Plain text body of a relayed contact message.
#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactEmailText<'a> {
    message: &'a ContactMessage,
}

/// A contact form submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl ContactMessage {
    /// Whether every required field has content.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.email, &self.subject, &self.message]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// The phone number, if one was given.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().map(str::trim).filter(|p| !p.is_empty())
    }

    /// Subject line of the relayed message.
    #[must_use]
    pub fn relay_subject(&self) -> String {
        format!("[TechFix-IT] {}", self.subject.trim())
    }

    /// Message text split into lines for the HTML body.
    #[must_use]
    pub fn message_lines(&self) -> Vec<&str> {
        self.message.lines().collect()
    }

    /// Render the text and HTML bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if a template fails to render.
    pub fn render(&self) -> Result<(String, String), askama::Error> {
        let text = ContactEmailText { message: self }.render()?;
        let html = ContactEmailHtml { message: self }.render()?;
        Ok((text, html))
    }
}

/// Errors that can occur when relaying a message.
#[derive(Debug, Error)]
pub enum MailError {
    /// The relay could not be reached or rejected our credentials.
    #[error("SMTP connection failed: {0}")]
    Connection(String),

    /// The relay refused the message.
    #[error("SMTP error: {0}")]
    Send(String),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Delivers contact form submissions.
#[async_trait]
pub trait MailRelay: Send + Sync + 'static {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError>;
}

/// SMTP relay.
#[derive(Clone)]
pub struct SmtpMailRelay {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailRelay {
    /// Create a relay from configuration.
    ///
    /// Upgrades to TLS when the server offers it and accepts self-signed
    /// certificates, which shared-hosting relays commonly present.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS parameters or addresses are invalid.
    pub fn new(config: &EmailConfig, recipient: &Email) -> Result<Self, MailError> {
        let credentials = Credentials::new(
            config.smtp_user.clone(),
            config.smtp_pass.expose_secret().to_string(),
        );
        let tls = TlsParameters::builder(config.smtp_host.clone())
            .dangerous_accept_invalid_certs(true)
            .build()
            .map_err(|e| MailError::Connection(e.to_string()))?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            .port(config.smtp_port)
            .tls(Tls::Opportunistic(tls))
            .credentials(credentials)
            .build();

        let from = Mailbox::new(
            Some(FROM_NAME.to_owned()),
            config
                .smtp_user
                .parse()
                .map_err(|_| MailError::InvalidAddress(config.smtp_user.clone()))?,
        );
        let to = recipient
            .as_str()
            .parse()
            .map_err(|_| MailError::InvalidAddress(recipient.to_string()))?;

        Ok(Self { mailer, from, to })
    }
}

#[async_trait]
impl MailRelay for SmtpMailRelay {
    async fn send_contact(&self, message: &ContactMessage) -> Result<(), MailError> {
        let reply_to: Mailbox = message
            .email
            .trim()
            .parse()
            .map_err(|_| MailError::InvalidAddress(message.email.clone()))?;
        let (text, html) = message.render()?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .subject(message.relay_subject())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        match self.mailer.test_connection().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(MailError::Connection("relay did not accept NOOP".to_owned()));
            }
            Err(e) => return Err(MailError::Connection(e.to_string())),
        }

        self.mailer
            .send(email)
            .await
            .map_err(|e| MailError::Send(e.to_string()))?;

        tracing::info!(subject = %message.relay_subject(), "Contact message relayed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message() -> ContactMessage {
        ContactMessage {
            name: "Aoife <script>".into(),
            email: "aoife@example.ie".into(),
            phone: Some("  ".into()),
            subject: "Backup quote".into(),
            message: "Line one\nLine two".into(),
        }
    }

    #[test]
    fn test_required_fields() {
        assert!(message().is_complete());
        let missing = ContactMessage {
            subject: "   ".into(),
            ..message()
        };
        assert!(!missing.is_complete());
        assert!(!ContactMessage::default().is_complete());
    }

    #[test]
    fn test_blank_phone_is_absent() {
        assert_eq!(message().phone(), None);
        let with_phone = ContactMessage {
            phone: Some(" 01 555 0100 ".into()),
            ..message()
        };
        assert_eq!(with_phone.phone(), Some("01 555 0100"));
    }

    #[test]
    fn test_subject_prefix() {
        assert_eq!(message().relay_subject(), "[TechFix-IT] Backup quote");
    }

    #[test]
    fn test_render_escapes_html_and_breaks_lines() {
        let (text, html) = message().render().unwrap();
        assert!(text.contains("Aoife <script>"));
        assert!(text.contains("Line one\nLine two"));
        assert!(html.contains("Aoife &#60;script&#62;") || html.contains("Aoife &lt;script&gt;"));
        assert!(html.contains("Line one<br>"));
        assert!(!html.contains("Phone:"));
    }
}
