//! Database operations for the site server.
//!
//! # Tables
//!
//! - `users` - Google-authenticated site users (`is_admin` gates the dashboard)
//! - `projects` - Portfolio projects
//! - `testimonials` - Client testimonials with moderation flags
//! - `notifications` - Per-user dashboard notifications
//! - `settings` - Single-row theme settings
//! - `reactions` - Anonymous emoji reactions on projects
//! - `sessions` - Tower-sessions storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p constructivo-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod notifications;
pub mod projects;
pub mod reactions;
pub mod settings;
pub mod testimonials;
pub mod users;

pub use notifications::NotificationRepository;
pub use projects::ProjectRepository;
pub use reactions::ReactionRepository;
pub use settings::SettingsRepository;
pub use testimonials::TestimonialRepository;
pub use users::UserRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness or referential constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
