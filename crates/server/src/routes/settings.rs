//! Theme settings routes.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::SettingsRepository;
use crate::error::AppError;
use crate::middleware::RequireAdmin;
use crate::models::Theme;
use crate::state::AppState;

/// Settings payload exchanged with clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub theme: Theme,
}

/// Fetch the current theme.
///
/// GET /api/settings
///
/// Returns the default theme when nothing has been saved yet, so the public
/// site always has something to render.
pub async fn get_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsPayload>, AppError> {
    let theme = SettingsRepository::new(state.pool())
        .get()
        .await?
        .map_or_else(Theme::default, |row| row.theme.0);

    Ok(Json(SettingsPayload { theme }))
}

/// Update the theme.
///
/// PATCH /api/settings (admin)
///
/// Upserts the single settings row. Like project mutations, this pushes no
/// invalidation; dashboards pick up the theme on their next fetch. Clients
/// still map the `settings` resource so a push would be honored if one were
/// ever added.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(body): Json<SettingsPayload>,
) -> Result<Json<SettingsPayload>, AppError> {
    let row = SettingsRepository::new(state.pool())
        .upsert_theme(&body.theme)
        .await?;

    tracing::info!("Theme settings updated");
    Ok(Json(SettingsPayload { theme: row.theme.0 }))
}
