//! Portfolio project routes.
//!
//! Project mutations deliberately push no cache invalidation to admin
//! dashboards; project data is refetched on navigation. Testimonials, users,
//! settings and notifications are the pushed resources.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use constructivo_core::ProjectId;

use crate::db::ProjectRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{NewProject, Project, ProjectUpdate};
use crate::state::AppState;

/// List all projects.
///
/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    let projects = ProjectRepository::new(state.pool()).list().await?;
    Ok(Json(projects))
}

/// Create a project.
///
/// POST /api/projects (admin)
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(new): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), AppError> {
    if new.title.trim().is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }

    let project = ProjectRepository::new(state.pool()).create(&new).await?;
    tracing::info!(project_id = %project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// Update a project.
///
/// PATCH /api/projects/{id} (admin)
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    Json(body): Json<ProjectUpdate>,
) -> Result<Json<Project>, AppError> {
    let project = ProjectRepository::new(state.pool())
        .update(id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    tracing::info!(project_id = %project.id, "Project updated");
    Ok(Json(project))
}

/// Delete a project.
///
/// DELETE /api/projects/{id} (admin)
pub async fn remove(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<Project>, AppError> {
    let project = ProjectRepository::new(state.pool())
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project".to_string()))?;

    tracing::info!(project_id = %project.id, "Project deleted");
    Ok(Json(project))
}
