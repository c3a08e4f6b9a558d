//! Admin area handlers.
//!
//! Every handler takes [`RequireAdminAuth`], so visitors without a session
//! are sent to the login page. Editors render the stored content as JSON and
//! save through `POST /api/content/{type}` from the browser.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use techfix_core::{ContentKind, LegalSlug, ServiceIcon};

use super::auth::MessageQuery;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

/// A link in the admin sidebar.
#[derive(Debug, Clone)]
pub struct AdminNavItem {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

fn admin_nav(active: Option<ContentKind>) -> Vec<AdminNavItem> {
    ContentKind::ALL
        .into_iter()
        .map(|kind| AdminNavItem {
            label: kind.label(),
            href: format!("/admin/{}", kind.admin_slug()),
            active: active == Some(kind),
        })
        .collect()
}

/// Editor guidance shown above the JSON document.
fn editor_hint(kind: ContentKind) -> String {
    match kind {
        ContentKind::Services => {
            let icons: Vec<&str> = ServiceIcon::ALL.iter().map(|icon| icon.name()).collect();
            format!(
                "An array of services. Order in the array is the display order. Icons: {}.",
                icons.join(", ")
            )
        }
        ContentKind::PricingPlans => {
            "An array of plans. Plans with \"featured\": true appear on the home page.".to_owned()
        }
        ContentKind::Testimonials => "An array of testimonials with a rating from 1 to 5.".to_owned(),
        ContentKind::LegalPages => {
            let slugs: Vec<&str> = LegalSlug::ALL.iter().map(|slug| slug.as_str()).collect();
            format!(
                "Legal pages in markdown. Slugs: {}. Pages left out of the array are kept.",
                slugs.join(", ")
            )
        }
        ContentKind::HeroSection
        | ContentKind::FooterContent
        | ContentKind::AboutPage
        | ContentKind::ContactPage => {
            "A single document. Leave a field out to show the built-in default.".to_owned()
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub admin: CurrentAdmin,
    pub nav: Vec<AdminNavItem>,
}

/// Content editor template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/editor.html")]
pub struct EditorTemplate {
    pub admin: CurrentAdmin,
    pub nav: Vec<AdminNavItem>,
    pub kind: &'static str,
    pub label: &'static str,
    pub hint: String,
    /// Current content, pretty-printed.
    pub document: String,
}

/// Profile (password change) template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/profile.html")]
pub struct ProfileTemplate {
    pub admin: CurrentAdmin,
    pub nav: Vec<AdminNavItem>,
    pub error: Option<String>,
    pub success: Option<&'static str>,
}

/// Password change form data.
#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the admin dashboard.
#[instrument(skip(admin))]
pub async fn dashboard(RequireAdminAuth(admin): RequireAdminAuth) -> impl IntoResponse {
    DashboardTemplate {
        admin,
        nav: admin_nav(None),
    }
}

/// Display the editor for one content kind.
///
/// # Errors
///
/// Returns 404 for an unknown editor and 500 if the document cannot be
/// serialized.
#[instrument(skip(state, admin))]
pub async fn editor(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(editor): Path<String>,
) -> Result<impl IntoResponse> {
    let kind = ContentKind::from_admin_slug(&editor)
        .ok_or_else(|| AppError::NotFound(format!("editor {editor}")))?;

    let current = state.content().as_json(kind).await;
    let document =
        serde_json::to_string_pretty(&current).map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(EditorTemplate {
        admin,
        nav: admin_nav(Some(kind)),
        kind: kind.as_str(),
        label: kind.label(),
        hint: editor_hint(kind),
        document,
    })
}

/// Display the profile page.
pub async fn profile_page(
    RequireAdminAuth(admin): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let error = query.error.map(|code| match code.as_str() {
        "current" => "Your current password is incorrect.".to_owned(),
        "mismatch" => "The new passwords do not match.".to_owned(),
        "weak" => format!(
            "Passwords must be between {} and {} characters.",
            crate::services::auth::MIN_PASSWORD_LENGTH,
            crate::services::auth::MAX_PASSWORD_LENGTH
        ),
        _ => "Your password could not be changed. Please try again.".to_owned(),
    });
    let success = query
        .success
        .filter(|code| code == "password")
        .map(|_| "Your password has been changed.");

    ProfileTemplate {
        admin,
        nav: admin_nav(None),
        error,
        success,
    }
}

/// Handle the password change form.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<PasswordForm>,
) -> Response {
    if form.new_password != form.confirm_password {
        return Redirect::to("/admin/profile?error=mismatch").into_response();
    }

    match AuthService::new(state.db())
        .change_password(admin.id, &form.current_password, &form.new_password)
        .await
    {
        Ok(()) => Redirect::to("/admin/profile?success=password").into_response(),
        Err(AuthError::InvalidCredentials) => {
            Redirect::to("/admin/profile?error=current").into_response()
        }
        Err(AuthError::WeakPassword(_)) => {
            Redirect::to("/admin/profile?error=weak").into_response()
        }
        Err(e) => {
            tracing::error!("Password change failed: {}", e);
            Redirect::to("/admin/profile?error=server").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_covers_every_kind() {
        let nav = admin_nav(Some(ContentKind::PricingPlans));
        assert_eq!(nav.len(), ContentKind::ALL.len());
        let active: Vec<_> = nav.iter().filter(|item| item.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].href, "/admin/pricing");
    }

    #[test]
    fn test_services_hint_lists_icons() {
        let hint = editor_hint(ContentKind::Services);
        assert!(hint.contains("ShieldCheck"));
        assert!(hint.contains("HelpCircle"));
    }
}
