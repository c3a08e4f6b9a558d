//! `x-request-id` for log and Sentry correlation.
//!
//! Fly.io's proxy stamps an id on every request it forwards. That id is
//! reused when it looks like one; anything else (missing, oversized, or
//! carrying characters that do not belong in a log field) is replaced with
//! a fresh UUID v4. The id is recorded on the `http_request` span, tagged on
//! the Sentry scope, and echoed back so an operator can quote it from the
//! browser when reporting a failed admin save or contact submission.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream id kept as-is.
const MAX_UPSTREAM_ID_LEN: usize = 128;

fn upstream_id(value: &str) -> Option<&str> {
    let id = value.trim();
    let well_formed = !id.is_empty()
        && id.len() <= MAX_UPSTREAM_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'));
    well_formed.then_some(id)
}

/// Attach a request id to the span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(upstream_id)
        .map_or_else(|| Uuid::new_v4().to_string(), str::to_owned);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
