//! Testimonial submission and moderation routes.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use tracing::instrument;

use constructivo_core::{Resource, TestimonialId};

use crate::db::{TestimonialRepository, UserRepository};
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::{NewTestimonial, Testimonial};
use crate::services::notify;
use crate::state::AppState;

/// Moderation decision for a testimonial.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Approved,
    Rejected,
}

/// Body of the status update.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ModerationStatus,
}

/// List every testimonial, including pending ones.
///
/// GET /api/testimonials (admin)
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    let rows = TestimonialRepository::new(state.pool()).list().await?;
    Ok(Json(rows))
}

/// List approved testimonials for the public site.
///
/// GET /api/testimonials/approved
pub async fn list_approved(
    State(state): State<AppState>,
) -> Result<Json<Vec<Testimonial>>, AppError> {
    let rows = TestimonialRepository::new(state.pool()).list_approved().await?;
    Ok(Json(rows))
}

/// Accept a public testimonial submission.
///
/// POST /api/testimonials
///
/// The submission lands in the moderation queue; admins get an in-app
/// notification and, when SMTP is configured, an email alert.
#[instrument(skip(state, new), fields(author = %new.name))]
pub async fn submit(
    State(state): State<AppState>,
    Json(new): Json<NewTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>), AppError> {
    if new.name.trim().is_empty() || new.content.trim().is_empty() {
        return Err(AppError::BadRequest("Name and content are required".to_string()));
    }

    let testimonial = TestimonialRepository::new(state.pool()).create(&new).await?;

    notify::notify_admins(
        state.pool(),
        state.registry(),
        "New testimonial",
        &format!("{} submitted a testimonial awaiting review", testimonial.name),
        notify::KIND_TESTIMONIAL,
    )
    .await?;

    if let Some(email) = state.email() {
        let admins = UserRepository::new(state.pool()).list_admins().await?;
        for admin in admins {
            // Alert mail is advisory; a failure must not fail the submission.
            if let Err(error) = email
                .send_testimonial_alert(&admin.email, &testimonial.name, &testimonial.content)
                .await
            {
                tracing::warn!(%error, to = %admin.email, "Failed to send testimonial alert");
            }
        }
    }

    tracing::info!(testimonial_id = %testimonial.id, "Testimonial submitted");
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// Approve or reject a testimonial.
///
/// PATCH /api/testimonials/{id}/status (admin)
///
/// Pushes `testimonials` after the write commits; the notification fan-out
/// pushes `notifications` itself.
pub async fn set_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Testimonial>, AppError> {
    let (approved, rejected) = match body.status {
        ModerationStatus::Approved => (true, false),
        ModerationStatus::Rejected => (false, true),
    };

    let testimonial = TestimonialRepository::new(state.pool())
        .set_status(id, approved, rejected)
        .await?
        .ok_or_else(|| AppError::NotFound("Testimonial".to_string()))?;

    state.invalidate_admin_cache(Resource::Testimonials);

    notify::notify_admins(
        state.pool(),
        state.registry(),
        &format!("Testimonial {}", testimonial.status_label()),
        &format!(
            "{} {} the testimonial from {}",
            admin.name,
            testimonial.status_label(),
            testimonial.name
        ),
        notify::KIND_TESTIMONIAL,
    )
    .await?;

    tracing::info!(
        testimonial_id = %testimonial.id,
        status = testimonial.status_label(),
        "Testimonial moderated"
    );
    Ok(Json(testimonial))
}

/// Delete a testimonial.
///
/// DELETE /api/testimonials/{id} (admin)
pub async fn remove(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<TestimonialId>,
) -> Result<Json<Testimonial>, AppError> {
    let testimonial = TestimonialRepository::new(state.pool())
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Testimonial".to_string()))?;

    state.invalidate_admin_cache(Resource::Testimonials);

    notify::notify_admins(
        state.pool(),
        state.registry(),
        "Testimonial deleted",
        &format!("{} deleted the testimonial from {}", admin.name, testimonial.name),
        notify::KIND_TESTIMONIAL,
    )
    .await?;

    tracing::info!(testimonial_id = %testimonial.id, "Testimonial deleted");
    Ok(Json(testimonial))
}
