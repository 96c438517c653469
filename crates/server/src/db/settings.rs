//! Settings repository for database operations.
//!
//! The settings table holds at most one row; reads take the first row and
//! writes upsert it.

use sqlx::PgPool;
use sqlx::types::Json;

use super::RepositoryError;
use crate::models::{SiteSettings, Theme};

const COLUMNS: &str = "id, theme, created_at, updated_at";

/// Repository for site settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row, if one has been written yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self) -> Result<Option<SiteSettings>, RepositoryError> {
        let row = sqlx::query_as::<_, SiteSettings>(&format!(
            "SELECT {COLUMNS} FROM settings ORDER BY id LIMIT 1"
        ))
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Write the theme, creating the row on first use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_theme(&self, theme: &Theme) -> Result<SiteSettings, RepositoryError> {
        // Single-row table: update the existing row if present, insert otherwise.
        if let Some(existing) = self.get().await? {
            let row = sqlx::query_as::<_, SiteSettings>(&format!(
                r"
                UPDATE settings SET theme = $2, updated_at = NOW()
                WHERE id = $1
                RETURNING {COLUMNS}
                "
            ))
            .bind(existing.id)
            .bind(Json(theme))
            .fetch_one(self.pool)
            .await?;

            return Ok(row);
        }

        let row = sqlx::query_as::<_, SiteSettings>(&format!(
            "INSERT INTO settings (theme) VALUES ($1) RETURNING {COLUMNS}"
        ))
        .bind(Json(theme))
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }
}
