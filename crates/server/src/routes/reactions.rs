//! Anonymous project reaction routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use constructivo_core::ProjectId;

use crate::db::ReactionRepository;
use crate::error::AppError;
use crate::models::{NewReaction, Reaction};
use crate::state::AppState;

/// List reactions on a project.
///
/// GET /api/projects/{id}/reactions
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<Reaction>>, AppError> {
    let rows = ReactionRepository::new(state.pool())
        .list_for_project(project_id)
        .await?;
    Ok(Json(rows))
}

/// Add a reaction to a project.
///
/// POST /api/projects/{id}/reactions
pub async fn create(
    State(state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Json(new): Json<NewReaction>,
) -> Result<(StatusCode, Json<Reaction>), AppError> {
    if new.emoji.trim().is_empty() || new.session_id.trim().is_empty() {
        return Err(AppError::BadRequest("Emoji and session ID are required".to_string()));
    }

    let row = ReactionRepository::new(state.pool())
        .create(project_id, &new)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}
