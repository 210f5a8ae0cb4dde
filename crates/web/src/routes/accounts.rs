//! Account route handlers.
//!
//! Handles registration, username/password login, logout and the account
//! page. Failed logins and duplicate usernames redirect back to the form with
//! an `?error=` code that the page turns into a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use recipe_book_core::UserId;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::schemas::{UserForm, validate_user};
use crate::services::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data, posted under the same `user[...]` keys as registration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    #[serde(rename = "user[username]")]
    pub username: String,
    #[serde(rename = "user[password]")]
    pub password: String,
}

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Turn an `?error=` code into the message shown on the form.
fn error_message(code: Option<&str>) -> Option<&'static str> {
    match code? {
        "credentials" => Some("Invalid username or password"),
        "username_taken" => Some("That username is already taken"),
        "session" => Some("Could not start a session, please try again"),
        _ => Some("Something went wrong, please try again"),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/login.html")]
pub struct LoginTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<&'static str>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/register.html")]
pub struct RegisterTemplate {
    pub user: Option<CurrentUser>,
    pub error: Option<&'static str>,
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/show.html")]
pub struct AccountTemplate {
    pub user: Option<CurrentUser>,
    pub username: String,
    pub email: String,
}

/// Anonymous account page template.
#[derive(Template, WebTemplate)]
#[template(path = "accounts/no_account.html")]
pub struct NoAccountTemplate {
    pub user: Option<CurrentUser>,
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    RegisterTemplate {
        user,
        error: error_message(query.error.as_deref()),
    }
}

/// Handle registration form submission.
///
/// Creates the user and logs them in straight away.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UserForm>,
) -> Result<Response> {
    let registration = validate_user(form).inspect_err(|e| {
        tracing::warn!(error = %e, "registration rejected");
    })?;

    let user = match AuthService::new(state.store()).register(registration).await {
        Ok(user) => user,
        Err(AuthError::UsernameTaken) => {
            tracing::warn!("registration failed: username taken");
            return Ok(Redirect::to("/accounts/register?error=username_taken").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let current = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to set session after registration: {}", e);
        return Ok(Redirect::to("/accounts/login?error=session").into_response());
    }
    set_sentry_user(&user.id, &user.username);

    Ok(Redirect::to("/accounts").into_response())
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LoginTemplate {
        user,
        error: error_message(query.error.as_deref()),
    }
}

/// Handle login form submission.
///
/// Unknown usernames and wrong passwords both land on the same
/// `?error=credentials` redirect.
#[instrument(skip(state, session, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let user = match AuthService::new(state.store())
        .login(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Login failed: invalid credentials");
            return Ok(Redirect::to("/accounts/login?error=credentials").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let current = CurrentUser::from(&user);
    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to set session: {}", e);
        return Ok(Redirect::to("/accounts/login?error=session").into_response());
    }
    set_sentry_user(&user.id, &user.username);

    Ok(Redirect::to("/accounts").into_response())
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/"))
}

// =============================================================================
// Account Routes
// =============================================================================

/// Send the visitor to their own account page, or the anonymous one.
pub async fn index(OptionalAuth(user): OptionalAuth) -> Redirect {
    match user {
        Some(user) => Redirect::to(&format!("/accounts/{}", user.id)),
        None => Redirect::to("/accounts/noAccount"),
    }
}

/// Display the logged-in user's account page.
///
/// Other users' pages are not viewable; those requests go back to `/accounts`.
#[instrument(skip(state, session, current))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current): RequireAuth,
    Path(id): Path<UserId>,
) -> Result<Response> {
    if current.id != id {
        return Ok(Redirect::to("/accounts").into_response());
    }

    let Some(user) = AuthService::new(state.store()).get_user(id).await? else {
        // The session outlived its user (e.g. the in-memory store restarted).
        clear_current_user(&session).await?;
        return Ok(Redirect::to("/accounts/login").into_response());
    };

    Ok(AccountTemplate {
        user: Some(current),
        username: user.username,
        email: user.email,
    }
    .into_response())
}

/// Display the page for visitors without an account session.
pub async fn no_account(OptionalAuth(user): OptionalAuth) -> NoAccountTemplate {
    NoAccountTemplate { user }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_login_form_uses_user_envelope() {
        let form: LoginForm = serde_json::from_value(serde_json::json!({
            "user[username]": "alice",
            "user[password]": "secret1"
        }))
        .unwrap();
        assert_eq!(form.username, "alice");
        assert_eq!(form.password, "secret1");

        let bare: LoginForm = serde_json::from_value(serde_json::json!({
            "username": "alice",
            "password": "secret1"
        }))
        .unwrap();
        assert!(bare.username.is_empty());
    }

    #[test]
    fn test_error_message_codes() {
        assert_eq!(
            error_message(Some("credentials")),
            Some("Invalid username or password")
        );
        assert_eq!(
            error_message(Some("username_taken")),
            Some("That username is already taken")
        );
        assert!(error_message(Some("anything")).is_some());
        assert_eq!(error_message(None), None);
    }
}
