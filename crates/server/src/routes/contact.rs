//! Contact form route.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use constructivo_core::Email;

use crate::error::AppError;
use crate::state::AppState;

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Response for form submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
}

/// Submit the contact form.
///
/// POST /api/contact
///
/// Forwards the message to the office inbox when SMTP is configured;
/// otherwise the submission is accepted and logged so local setups without
/// mail credentials keep working.
#[instrument(skip(state, form), fields(from = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>, AppError> {
    let email = Email::parse(form.email.trim())
        .map_err(|_| AppError::BadRequest("Please enter a valid email address".to_string()))?;

    let name = form.name.trim();
    let message = form.message.trim();
    if name.is_empty() || message.is_empty() {
        return Err(AppError::BadRequest("Name and message are required".to_string()));
    }

    match state.email() {
        Some(service) => {
            service
                .send_contact_message(name, email.as_str(), message)
                .await?;
        }
        None => {
            tracing::warn!(from = %email, "Contact message received but SMTP is not configured");
        }
    }

    Ok(Json(ContactResponse { success: true }))
}
