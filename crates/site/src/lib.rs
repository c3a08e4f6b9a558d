//! TechFix-IT site library.
//!
//! This crate provides the marketing site, the admin area and the JSON
//! content API as a library, allowing the router to be built over any
//! store and tested without a server.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::path::Path;

use axum::{Router, body::Body, http::Request};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Static assets shipped with the crate.
pub const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Build the application router.
///
/// The session layer is passed in so tests can use an in-memory session
/// store while the binary uses Postgres.
pub fn build_router<S>(state: AppState, session_layer: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    let upload_dir = state.config().upload_dir.clone();

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(Path::new(STATIC_DIR)))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
