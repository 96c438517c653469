//! Reaction repository for database operations.

use sqlx::PgPool;

use constructivo_core::ProjectId;

use super::RepositoryError;
use crate::models::{NewReaction, Reaction};

const COLUMNS: &str = "id, project_id, emoji, session_id, created_at";

/// Repository for project reactions.
pub struct ReactionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReactionRepository<'a> {
    /// Create a new reaction repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List reactions for a project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_project(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Reaction>, RepositoryError> {
        let rows = sqlx::query_as::<_, Reaction>(&format!(
            "SELECT {COLUMNS} FROM reactions WHERE project_id = $1 ORDER BY id"
        ))
        .bind(project_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a reaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the project does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        project_id: ProjectId,
        new: &NewReaction,
    ) -> Result<Reaction, RepositoryError> {
        let row = sqlx::query_as::<_, Reaction>(&format!(
            r"
            INSERT INTO reactions (project_id, emoji, session_id)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "
        ))
        .bind(project_id)
        .bind(&new.emoji)
        .bind(&new.session_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict("project does not exist".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        Ok(row)
    }
}
