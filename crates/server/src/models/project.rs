//! Project portfolio domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use constructivo_core::ProjectId;

/// A portfolio project shown on the public site and managed in the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub description: String,
    /// Category slug used for portfolio filtering (e.g. "residential").
    pub category: String,
    /// Image URLs, already uploaded elsewhere; this server only stores them.
    pub images: Vec<String>,
    /// Featured projects appear in the home page hero section.
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Payload for updating a project. All fields required, matching the
/// dashboard's full-form submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub title: String,
    pub description: String,
    pub category: String,
    pub images: Vec<String>,
    pub featured: bool,
}
