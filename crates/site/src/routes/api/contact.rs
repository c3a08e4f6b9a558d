//! `POST /api/contact`: relay a contact form submission by email.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::instrument;

use techfix_core::Email;

use crate::error::ApiError;
use crate::services::{ContactMessage, MailError};
use crate::state::AppState;

fn send_failure(e: &MailError) -> ApiError {
    let error = match e {
        MailError::Connection(_) => "SMTP connection failed.",
        _ => "Failed to send email.",
    };
    ApiError::internal(error).with_detail(e.to_string())
}

/// Validate and relay a contact message.
///
/// # Errors
///
/// Returns 400 when a required field is missing or the email address is
/// invalid, and 500 when no relay is configured or delivery fails.
#[instrument(skip(state, payload))]
pub async fn send_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactMessage>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(message) = payload.map_err(|e| {
        ApiError::bad_request("All fields are required.").with_detail(e.body_text())
    })?;

    if !message.is_complete() {
        return Err(ApiError::bad_request("All fields are required."));
    }
    if Email::parse(message.email.trim()).is_err() {
        return Err(ApiError::bad_request("A valid email address is required."));
    }

    let Some(mailer) = state.mailer() else {
        tracing::error!("Contact message dropped: no mail relay configured");
        return Err(ApiError::internal("Failed to send email.")
            .with_detail("mail relay is not configured"));
    };

    mailer.send_contact(&message).await.map_err(|e| {
        let event_id = sentry::capture_error(&e);
        tracing::error!(error = %e, sentry_event_id = %event_id, "Contact relay failed");
        send_failure(&e)
    })?;

    Ok(Json(json!({ "success": true })))
}
