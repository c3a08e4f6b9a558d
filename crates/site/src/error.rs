//! Unified error handling with Sentry integration.
//!
//! - [`AppError`]: HTML page handlers. Server errors are captured to Sentry
//!   and answered with a short plain message.
//! - [`ApiError`]: JSON handlers under `/api`. The body is
//!   `{"error": ..., "detail"?: ...}`. Store failures carry the underlying
//!   message verbatim since the admin editors are the only consumer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::content::ContentError;

/// Application-level error type for page handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to visitors
        let message = match &self {
            Self::NotFound(_) => "Page not found",
            Self::Internal(_) => "Internal server error",
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Error response for API endpoints.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    #[must_use]
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            detail: None,
        }
    }

    /// 400 with a fixed message.
    #[must_use]
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 500 carrying an upstream failure.
    #[must_use]
    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Invalid(message) => Self::bad_request(message),
            ContentError::Store(e) => {
                let event_id = sentry::capture_error(&e);
                tracing::error!(error = %e, sentry_event_id = %event_id, "Content write failed");
                Self::internal(e.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Set the Sentry user context after an admin logs in.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on logout.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("service backup".to_string());
        assert_eq!(err.to_string(), "Not found: service backup");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_content_errors_map_to_api_status() {
        let invalid = ApiError::from(ContentError::Invalid("services expects an array".into()));
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.error, "services expects an array");

        let store = ApiError::from(ContentError::Store(RepositoryError::Conflict(
            "services: duplicate key".into(),
        )));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(store.error, "constraint violation: services: duplicate key");
    }

    #[test]
    fn test_api_error_body() {
        let err = ApiError::internal("Failed to send email.").with_detail("timed out");
        let body = serde_json::to_value(&err).unwrap_or_default();
        assert_eq!(
            body,
            serde_json::json!({"error": "Failed to send email.", "detail": "timed out"})
        );
    }
}
