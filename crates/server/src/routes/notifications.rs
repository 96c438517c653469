//! Dashboard notification routes.
//!
//! Every admin sees only their own rows; reads and dismissals are scoped by
//! user ID at the query level.

use axum::{
    Json,
    extract::{Path, State},
};

use constructivo_core::{NotificationId, Resource};

use crate::db::NotificationRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::Notification;
use crate::state::AppState;

/// List the caller's notifications, newest first.
///
/// GET /api/notifications (admin)
pub async fn list(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let rows = NotificationRepository::new(state.pool())
        .list_for_user(admin.id)
        .await?;
    Ok(Json(rows))
}

/// Mark one of the caller's notifications read.
///
/// PATCH /api/notifications/{id}/read (admin)
///
/// Pushes `notifications` after the write commits so other open tabs of the
/// same dashboard refresh their badge.
pub async fn mark_read(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
) -> Result<Json<Notification>, AppError> {
    let row = NotificationRepository::new(state.pool())
        .mark_read(id, admin.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;

    state.invalidate_admin_cache(Resource::Notifications);
    Ok(Json(row))
}

/// Mark all of the caller's notifications read.
///
/// POST /api/notifications/mark-all-read (admin)
///
/// Pushes `notifications` after the update, even when no rows changed.
pub async fn mark_all_read(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let updated = NotificationRepository::new(state.pool())
        .mark_all_read(admin.id)
        .await?;

    state.invalidate_admin_cache(Resource::Notifications);

    Ok(Json(serde_json::json!({ "updated": updated })))
}
