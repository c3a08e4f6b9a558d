//! Core types for the TechFix-IT site.

pub mod email;
pub mod icon;
pub mod id;
pub mod kind;
pub mod legal;

pub use email::{Email, EmailError};
pub use icon::ServiceIcon;
pub use id::AdminUserId;
pub use kind::{ContentKind, ContentShape, UnknownContentKind};
pub use legal::LegalSlug;
