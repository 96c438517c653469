//! Project reaction domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use constructivo_core::{ProjectId, ReactionId};

/// An anonymous emoji reaction on a portfolio project.
///
/// `session_id` is a browser-generated identifier; there is no account
/// linkage and no uniqueness constraint beyond what the UI enforces.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub id: ReactionId,
    pub project_id: ProjectId,
    pub emoji: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for posting a reaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReaction {
    pub emoji: String,
    pub session_id: String,
}
