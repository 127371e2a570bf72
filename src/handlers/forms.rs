use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{CareerApplication, ContactForm};
use crate::services::careers::submit_application;
use crate::services::contact::{send_contact, ContactOutcome};
use crate::state::AppState;

// POST /api/contact
pub async fn submit_contact(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ContactForm>,
) -> Result<Json<ContactOutcome>, AppError> {
    let outcome = send_contact(
        state.notifier.as_deref(),
        &form,
        &state.config.business_name,
        &state.config.contact_email,
    )
    .await?;
    Ok(Json(outcome))
}

// POST /api/careers
#[derive(Serialize)]
pub struct CareerResponse {
    id: String,
    message: String,
}

pub async fn submit_career(
    State(state): State<Arc<AppState>>,
    Json(application): Json<CareerApplication>,
) -> Result<Json<CareerResponse>, AppError> {
    let stored = submit_application(
        &state.db,
        Path::new(&state.config.resume_dir),
        &application,
    )
    .await?;

    Ok(Json(CareerResponse {
        id: stored.id,
        message: "Thank you for applying! We'll review your resume and get back to you.".to_string(),
    }))
}
