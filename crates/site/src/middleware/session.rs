//! Session middleware configuration.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. Only admins
//! ever get a session; public pages never write to it.

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::SiteConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "tf_admin_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with the `PostgreSQL` store.
///
/// The session table is created by `tf-cli migrate`.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &SiteConfig,
) -> SessionManagerLayer<PostgresStore> {
    configure_session_layer(PostgresStore::new(pool.clone()), config)
}

/// Apply the cookie policy to a layer over any session store.
///
/// Tests use this with tower-sessions' `MemoryStore`.
#[must_use]
pub fn configure_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &SiteConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
