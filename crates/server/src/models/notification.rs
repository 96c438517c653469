//! Admin notification domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use constructivo_core::{NotificationId, UserId};

/// An in-dashboard notification for a specific user.
///
/// Created by moderation actions (e.g. testimonial approvals) for every
/// admin; each admin reads and dismisses their own copy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    /// Free-form category tag ("testimonial", "system", ...).
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
