//! Contact form route handlers.

use axum::{Json, extract::State};
use jacksnack_core::Email;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::MessageRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Contact form submission body.
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
/// POST /contact
///
/// The message is persisted first; the auto-response email is best-effort
/// and runs after the response is already determined.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactResponse>> {
    let name = form.name.trim().to_owned();
    let message = form.message.trim().to_owned();

    if name.chars().count() < 2 {
        return Err(AppError::Validation(
            "Name must be at least 2 characters.".to_owned(),
        ));
    }
    let email = Email::parse(&form.email)
        .map_err(|_| AppError::Validation("Please enter a valid email.".to_owned()))?;
    if message.chars().count() < 10 {
        return Err(AppError::Validation(
            "Message must be at least 10 characters.".to_owned(),
        ));
    }

    MessageRepository::new(state.pool())
        .insert(&name, email.as_str(), &message)
        .await?;

    let notifier = state.notifier().clone();
    tokio::spawn(async move {
        notifier
            .contact_received(&name, email.as_str(), &message)
            .await;
    });

    Ok(Json(ContactResponse { success: true }))
}
