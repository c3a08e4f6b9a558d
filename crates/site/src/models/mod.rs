//! Domain models for the site.

pub mod admin_user;
pub mod session;

pub use admin_user::{AdminCredentials, AdminUser};
pub use session::{CurrentAdmin, WriteCapability, keys as session_keys};
