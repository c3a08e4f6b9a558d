//! Content read façade and write path.
//!
//! - [`ContentReader`]: one read per content kind. Reads never fail the
//!   caller; store errors are logged and degrade to empty values so public
//!   pages always render.
//! - [`ContentWriter`]: validates a replacement body for a content kind
//!   and syncs it into the store. Requires a [`WriteCapability`].
//!
//! [`WriteCapability`]: crate::models::WriteCapability

mod markdown;
mod read;
mod write;

pub use markdown::{LegalPageView, render_markdown};
pub use read::ContentReader;
pub use write::{ContentError, ContentWriter, WriteSummary};
