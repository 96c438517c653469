//! Admin flag management.
//!
//! Accounts are created by Google sign-in, never from the CLI; these
//! commands only flip the admin flag on existing accounts. Useful when the
//! first-user-becomes-admin rule picked the wrong person, or the last admin
//! locked themselves out.

use constructivo_server::db::UserRepository;

use super::CommandError;

/// Grant or revoke the admin flag for the user with the given email.
pub async fn set_admin(email: &str, is_admin: bool) -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .get_by_email(email)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.to_string()))?;

    let updated = users
        .set_admin_status(user.id, is_admin)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(email.to_string()))?;

    tracing::info!(
        user_id = %updated.id,
        email = %updated.email,
        is_admin = updated.is_admin,
        "Admin flag updated"
    );
    Ok(())
}
