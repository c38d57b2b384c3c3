//! Authentication route handlers.
//!
//! Handles login, registration, and logout. Failures uniformly route the
//! caller back to the login flow with a coarse error query parameter; no
//! detail beyond that is leaked.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::error;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

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
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());

    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                email: user.email.clone(),
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            error::set_sentry_user(&user.id, Some(user.email.as_str()));
            Redirect::to("/account").into_response()
        }
        Err(e) => {
            // Wrong password and unknown user land here identically
            tracing::warn!("Login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate { error: query.error }
}

/// Handle registration form submission.
///
/// Successful registration logs the user straight in. Failures route back
/// to the login flow.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    // Validate passwords match
    if form.password.is_empty() || form.password != form.password_confirm {
        return Redirect::to("/auth/login?error=password_mismatch").into_response();
    }

    if form.email.is_empty() {
        return Redirect::to("/auth/login?error=email_required").into_response();
    }

    let auth = AuthService::new(state.pool());

    match auth.register(&form.email, &form.password).await {
        Ok(user) => {
            let current = CurrentUser {
                id: user.id,
                email: user.email.clone(),
            };

            if let Err(e) = set_current_user(&session, &current).await {
                tracing::error!("Failed to set session after registration: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }

            error::set_sentry_user(&user.id, Some(user.email.as_str()));
            Redirect::to("/").into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            Redirect::to("/auth/login?error=email_taken").into_response()
        }
        Err(e) => {
            tracing::warn!("Registration failed: {}", e);
            Redirect::to("/auth/login?error=failed").into_response()
        }
    }
}

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
///
/// Clears the session and redirects home.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    error::clear_sentry_user();

    Redirect::to("/").into_response()
}
