//! User management routes.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use constructivo_core::{Resource, UserId};

use crate::db::UserRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// Body of the admin-status update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatusUpdate {
    pub is_admin: bool,
}

/// List every user.
///
/// GET /api/users (admin)
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users))
}

/// Grant or revoke another user's admin access.
///
/// PATCH /api/users/{id}/admin-status (admin)
///
/// An admin may not change their own flag; that would let the last admin
/// lock everyone out. Pushes `users` after the write commits.
pub async fn set_admin_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(body): Json<AdminStatusUpdate>,
) -> Result<Json<User>, AppError> {
    if id == admin.id {
        return Err(AppError::Forbidden(
            "You cannot change your own admin status".to_string(),
        ));
    }

    let user = UserRepository::new(state.pool())
        .set_admin_status(id, body.is_admin)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    state.invalidate_admin_cache(Resource::Users);

    tracing::info!(
        user_id = %user.id,
        is_admin = user.is_admin,
        changed_by = %admin.id,
        "Admin status changed"
    );
    Ok(Json(user))
}
