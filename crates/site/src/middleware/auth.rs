//! Session guard for the admin area and content writes.
//!
//! The session is read once per request by one of these extractors. Admin
//! pages take [`RequireAdminAuth`]; the content API takes
//! [`AdminWriteAccess`], which hands the handler a [`WriteCapability`] to
//! pass into the content writer.

use axum::{
    Json,
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, WriteCapability, session_keys};

/// Where unauthenticated admin page requests are sent.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires admin authentication.
///
/// If the admin is not logged in, returns a redirect to the login page
/// for HTML requests, or 401 Unauthorized for API requests.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.name)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Extractor for content writes. Carries the capability the writer demands.
pub struct AdminWriteAccess(pub WriteCapability);

/// Error returned when admin authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response(),
        }
    }
}

async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        if let Some(admin) = current_admin(session).await {
            return Ok(Self(admin));
        }

        // Nested routers see a stripped `uri`; the full path is kept in `OriginalUri`.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path().to_owned(), |uri| uri.path().to_owned());

        if path.starts_with("/api/") {
            return Err(AdminAuthRejection::Unauthorized);
        }

        // Remember the page so login can send the admin back to it.
        if let Err(e) = session.insert(session_keys::RETURN_TO, &path).await
        {
            tracing::warn!("Failed to store return path: {}", e);
        }
        Err(AdminAuthRejection::RedirectToLogin)
    }
}

impl<S> FromRequestParts<S> for AdminWriteAccess
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::Unauthorized)?;

        let admin = current_admin(session)
            .await
            .ok_or(AdminAuthRejection::Unauthorized)?;

        Ok(Self(admin.write_capability()))
    }
}

/// Extractor that optionally gets the current admin.
///
/// Unlike `RequireAdminAuth`, this does not reject the request if the admin is not logged in.
pub struct OptionalAdminAuth(pub Option<CurrentAdmin>);

impl<S> FromRequestParts<S> for OptionalAdminAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let admin = match parts.extensions.get::<Session>() {
            Some(session) => current_admin(session).await,
            None => None,
        };

        Ok(Self(admin))
    }
}

/// Helper to set the current admin in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Helper to clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}
