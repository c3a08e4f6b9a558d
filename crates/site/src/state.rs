//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::SiteConfig;
use crate::db::Database;
use crate::services::{ContentReader, ContentWriter, MailRelay, ObjectStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the content store and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    db: Arc<dyn Database>,
    uploads: Arc<dyn ObjectStore>,
    mailer: Option<Arc<dyn MailRelay>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Site configuration
    /// * `db` - Content and admin account store
    /// * `uploads` - Where admin image uploads are written
    /// * `mailer` - Contact form relay; contact submissions fail without one
    #[must_use]
    pub fn new(
        config: SiteConfig,
        db: Arc<dyn Database>,
        uploads: Arc<dyn ObjectStore>,
        mailer: Option<Arc<dyn MailRelay>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                uploads,
                mailer,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database.
    #[must_use]
    pub fn db(&self) -> &dyn Database {
        self.inner.db.as_ref()
    }

    /// Content read façade over the database.
    #[must_use]
    pub fn content(&self) -> ContentReader<'_> {
        ContentReader::new(self.db())
    }

    /// Content write path over the database.
    #[must_use]
    pub fn content_writer(&self) -> ContentWriter<'_> {
        ContentWriter::new(self.db())
    }

    #[must_use]
    pub fn uploads(&self) -> &dyn ObjectStore {
        self.inner.uploads.as_ref()
    }

    #[must_use]
    pub fn mailer(&self) -> Option<&dyn MailRelay> {
        self.inner.mailer.as_deref()
    }
}
