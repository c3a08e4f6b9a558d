//! JSON API handlers.
//!
//! Responses are JSON in both directions. Failures use [`ApiError`]'s
//! `{"error": ..., "detail"?: ...}` body, except uploads, which keep the
//! `{"success": false, "message": ...}` shape the editors expect.
//!
//! [`ApiError`]: crate::error::ApiError

pub mod contact;
pub mod content;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::middleware::contact_rate_limiter;
use crate::state::AppState;

/// Largest accepted image upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the API routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/content/{type}",
            get(content::read_content).post(content::write_content),
        )
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/contact",
            post(contact::send_contact).layer(contact_rate_limiter()),
        )
}
