//! Google OAuth sign-in and session routes.

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use constructivo_core::Email;

use crate::db::UserRepository;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::google;
use crate::state::AppState;

/// Where the dashboard lives; sign-in always lands there.
const POST_LOGIN_REDIRECT: &str = "/admin";

/// Query parameters Google appends to the callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Start the OAuth flow.
///
/// GET /auth/google
pub async fn google_login(
    State(state): State<AppState>,
    session: Session,
) -> Result<Redirect, AppError> {
    let nonce = google::generate_state();
    session.insert(session_keys::OAUTH_STATE, &nonce).await?;

    Ok(Redirect::to(&state.google().authorize_url(&nonce)))
}

/// Complete the OAuth flow.
///
/// GET /auth/google/callback
///
/// Exchanges the code, fetches the Google profile, and signs the user in,
/// creating the account on first sight. The very first account ever created
/// becomes admin; everyone else starts as a regular user.
#[instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect, AppError> {
    if let Some(error) = params.error {
        tracing::warn!(%error, "Google returned an OAuth error");
        return Err(AppError::BadRequest("Google sign-in was cancelled".to_string()));
    }

    // CSRF check: the state must match what we stashed before redirecting.
    let expected: Option<String> = session.remove(session_keys::OAUTH_STATE).await?;
    match (&params.state, expected) {
        (Some(got), Some(want)) if *got == want => {}
        _ => return Err(AppError::BadRequest("OAuth state mismatch".to_string())),
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    let token = state.google().exchange_code(&code).await?;
    let profile = state.google().fetch_user(&token).await?;

    let email = Email::parse(&profile.email)
        .map_err(|e| AppError::BadRequest(format!("Unusable Google email: {e}")))?;

    let users = UserRepository::new(state.pool());
    let user = match users.get_by_email(email.as_str()).await? {
        Some(user) => user,
        None => {
            // First account ever created gets the admin flag.
            let is_first = users.count().await? == 0;
            let name = profile
                .name
                .clone()
                .unwrap_or_else(|| email.local_part().to_string());
            let user = users.create(email.as_str(), &name, is_first).await?;

            tracing::info!(user_id = %user.id, is_admin = user.is_admin, "New user created");

            if let Some(email) = state.email() {
                // Welcome mail is advisory; a failure must not block sign-in.
                if let Err(error) = email.send_welcome_email(&user.email, &user.name).await {
                    tracing::warn!(%error, "Failed to send welcome email");
                }
            }

            user
        }
    };

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(&user.email));

    tracing::info!(user_id = %user.id, google_sub = %profile.sub, "User signed in");
    Ok(Redirect::to(POST_LOGIN_REDIRECT))
}

/// Return the signed-in user.
///
/// GET /api/user
pub async fn current_user(
    crate::middleware::RequireUser(user): crate::middleware::RequireUser,
) -> Json<CurrentUser> {
    Json(user)
}

/// Sign out.
///
/// POST /api/logout
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(Json(serde_json::json!({ "success": true })))
}

