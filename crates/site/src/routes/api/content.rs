//! `GET` and `POST /api/content/{type}`.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde_json::{Value, json};
use tracing::instrument;

use techfix_core::ContentKind;

use crate::error::ApiError;
use crate::middleware::AdminWriteAccess;
use crate::state::AppState;

fn parse_kind(raw: &str) -> Result<ContentKind, ApiError> {
    raw.parse::<ContentKind>()
        .map_err(|_| ApiError::bad_request("Invalid type"))
}

/// Return the current content of a kind.
///
/// # Errors
///
/// Returns 400 for an unknown type. Store failures degrade to an empty
/// document or list.
#[instrument(skip(state))]
pub async fn read_content(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.content().as_json(kind).await))
}

/// Replace the content of a kind.
///
/// # Errors
///
/// Returns 401 without an admin session, 400 for an unknown type or a body
/// that does not fit the kind, and 500 when the store fails.
#[instrument(skip(state, access, body), fields(bytes = body.len()))]
pub async fn write_content(
    State(state): State<AppState>,
    access: AdminWriteAccess,
    Path(kind): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let AdminWriteAccess(capability) = access;
    let kind = parse_kind(&kind)?;
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request("Invalid JSON body").with_detail(e.to_string()))?;

    state
        .content_writer()
        .apply(&capability, kind, body)
        .await?;

    Ok(Json(json!({ "success": true })))
}
