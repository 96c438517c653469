//! Project repository for database operations.

use sqlx::PgPool;

use constructivo_core::ProjectId;

use super::RepositoryError;
use crate::models::{NewProject, Project, ProjectUpdate};

/// Repository for project database operations.
pub struct ProjectRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every project, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let projects = sqlx::query_as::<_, Project>(
            r"
            SELECT id, title, description, category, images, featured, created_at
            FROM projects ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(projects)
    }

    /// Insert a new project.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewProject) -> Result<Project, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(
            r"
            INSERT INTO projects (title, description, category, images, featured)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, category, images, featured, created_at
            ",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(&new.images)
        .bind(new.featured)
        .fetch_one(self.pool)
        .await?;

        Ok(project)
    }

    /// Update a project. Returns `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ProjectId,
        update: &ProjectUpdate,
    ) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(
            r"
            UPDATE projects
            SET title = $2, description = $3, category = $4, images = $5, featured = $6
            WHERE id = $1
            RETURNING id, title, description, category, images, featured, created_at
            ",
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.category)
        .bind(&update.images)
        .bind(update.featured)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }

    /// Delete a project. Returns the deleted row, or `None` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProjectId) -> Result<Option<Project>, RepositoryError> {
        let project = sqlx::query_as::<_, Project>(
            r"
            DELETE FROM projects WHERE id = $1
            RETURNING id, title, description, category, images, featured, created_at
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(project)
    }
}
