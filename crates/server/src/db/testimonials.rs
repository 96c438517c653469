//! Testimonial repository for database operations.

use sqlx::PgPool;

use constructivo_core::TestimonialId;

use super::RepositoryError;
use crate::models::{NewTestimonial, Testimonial};

const COLUMNS: &str = "id, name, role, content, approved, rejected, created_at";

/// Repository for testimonial database operations.
pub struct TestimonialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TestimonialRepository<'a> {
    /// Create a new testimonial repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every testimonial, including unmoderated ones. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// List approved testimonials, newest first. Public.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved(&self) -> Result<Vec<Testimonial>, RepositoryError> {
        let rows = sqlx::query_as::<_, Testimonial>(&format!(
            "SELECT {COLUMNS} FROM testimonials WHERE approved ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Insert a public submission (lands unapproved).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, new: &NewTestimonial) -> Result<Testimonial, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            r"
            INSERT INTO testimonials (name, role, content)
            VALUES ($1, $2, $3)
            RETURNING {COLUMNS}
            "
        ))
        .bind(&new.name)
        .bind(&new.role)
        .bind(&new.content)
        .fetch_one(self.pool)
        .await?;

        Ok(row)
    }

    /// Set the moderation flags. Returns `None` if the testimonial does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_status(
        &self,
        id: TestimonialId,
        approved: bool,
        rejected: bool,
    ) -> Result<Option<Testimonial>, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            r"
            UPDATE testimonials SET approved = $2, rejected = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "
        ))
        .bind(id)
        .bind(approved)
        .bind(rejected)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }

    /// Delete a testimonial. Returns the deleted row, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: TestimonialId) -> Result<Option<Testimonial>, RepositoryError> {
        let row = sqlx::query_as::<_, Testimonial>(&format!(
            "DELETE FROM testimonials WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row)
    }
}
