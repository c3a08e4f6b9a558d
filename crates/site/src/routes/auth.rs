//! Admin login and logout.
//!
//! Credentials are checked against `admin_users` with argon2. A successful
//! login cycles the session id before storing the admin, then returns to the
//! admin page that sent the visitor here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::session_keys;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// Where a login lands when no admin page asked for it.
const ADMIN_HOME: &str = "/admin";

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

fn error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "session" => "Your session could not be started. Please try again.",
        _ => "Something went wrong. Please try again.",
    }
}

fn success_message(code: &str) -> Option<&'static str> {
    match code {
        "logged_out" => Some("You have been signed out."),
        _ => None,
    }
}

/// Only admin paths are honoured as return targets.
fn return_target(stored: Option<String>) -> String {
    stored
        .filter(|path| path.starts_with(ADMIN_HOME))
        .unwrap_or_else(|| ADMIN_HOME.to_owned())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to(ADMIN_HOME).into_response();
    }

    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success.as_deref().and_then(success_message),
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let admin = match AuthService::new(state.db())
        .login(&form.email, &form.password)
        .await
    {
        Ok(admin) => admin,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Admin login rejected");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
        Err(e) => {
            tracing::error!("Admin login failed: {}", e);
            return Redirect::to("/auth/login?error=server").into_response();
        }
    };

    let return_to = session
        .remove::<String>(session_keys::RETURN_TO)
        .await
        .ok()
        .flatten();

    if let Err(e) = session.cycle_id().await {
        tracing::error!("Failed to cycle session id: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }
    if let Err(e) = set_current_admin(&session, &admin).await {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to("/auth/login?error=session").into_response();
    }

    set_sentry_user(&admin.id, Some(admin.email.as_str()));
    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Redirect::to(&return_target(return_to)).into_response()
}

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_admin(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    Redirect::to("/auth/login?success=logged_out").into_response()
}
