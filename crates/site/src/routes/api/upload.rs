//! `POST /api/upload`: store one image from the admin editors.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::uploads::object_name;
use crate::state::AppState;

/// Multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Upload response body.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadResponse {
    fn stored(url: String) -> Response {
        Json(Self {
            success: true,
            url: Some(url),
            message: None,
        })
        .into_response()
    }

    fn failed(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                success: false,
                url: None,
                message: Some(message.into()),
            }),
        )
            .into_response()
    }
}

/// Store the `file` field and return its public URL.
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Malformed upload: {}", e);
                return UploadResponse::failed(e.status(), e.body_text());
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().map(str::to_owned);
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to read upload: {}", e);
                return UploadResponse::failed(e.status(), e.body_text());
            }
        };

        let name = object_name(&original);
        return match state
            .uploads()
            .put(&name, content_type.as_deref(), bytes)
            .await
        {
            Ok(url) => {
                tracing::info!(%url, "Upload stored");
                UploadResponse::stored(url)
            }
            Err(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Upload failed");
                UploadResponse::failed(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };
    }

    UploadResponse::failed(StatusCode::BAD_REQUEST, "No file uploaded")
}
