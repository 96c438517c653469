//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use constructivo_core::UserId;

/// A site user, created on first Google sign-in.
///
/// The first user ever created is flagged admin; everyone after that starts
/// as a regular user until an existing admin promotes them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Email address from the Google profile.
    pub email: String,
    /// Display name from the Google profile (local part of the email as fallback).
    pub name: String,
    /// Whether this user may access the admin dashboard.
    pub is_admin: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
