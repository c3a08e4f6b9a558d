//! Business logic services for the site.
//!
//! # Services
//!
//! - `auth` - Admin login and password management (argon2)
//! - `content` - Content read façade and write path
//! - `email` - Contact form relay (SMTP via lettre)
//! - `uploads` - Image uploads to a local directory or hosted bucket

pub mod auth;
pub mod content;
pub mod email;
pub mod uploads;

pub use auth::{AuthError, AuthService};
pub use content::{ContentError, ContentReader, ContentWriter, LegalPageView};
pub use email::{ContactMessage, MailError, MailRelay, SmtpMailRelay};
pub use uploads::{HttpObjectStore, LocalObjectStore, ObjectStore, UploadError};
