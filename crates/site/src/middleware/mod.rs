//! HTTP middleware stack for the site.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, framing, referrer, cache policy)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on login and contact (governor, per route)

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminWriteAccess, OptionalAdminAuth, RequireAdminAuth, clear_current_admin,
    set_current_admin,
};
pub use rate_limit::{contact_rate_limiter, login_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, configure_session_layer, create_session_layer};
