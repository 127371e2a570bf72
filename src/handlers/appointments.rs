use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::DraftAppointment;
use crate::services::booking::available_time_slots;
use crate::state::AppState;

// GET /api/appointments/slots?date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: String,
    slots: Vec<String>,
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("'{raw}' is not a valid date (expected YYYY-MM-DD)")))
}

pub async fn get_slots(Query(query): Query<SlotsQuery>) -> Result<Json<SlotsResponse>, AppError> {
    let date = match query.date.as_deref() {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    Ok(Json(SlotsResponse {
        date: date.format("%Y-%m-%d").to_string(),
        slots: available_time_slots(date),
    }))
}

// POST /api/appointments
#[derive(Serialize)]
pub struct CreateAppointmentResponse {
    id: String,
    status: String,
    calendar_url: String,
    message: String,
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<DraftAppointment>,
) -> Result<Json<CreateAppointmentResponse>, AppError> {
    let appointment = draft.to_appointment()?;
    parse_date(&appointment.date)?;
    NaiveTime::parse_from_str(&appointment.time, "%H:%M").map_err(|_| {
        AppError::Validation(format!(
            "'{}' is not a valid time (expected HH:MM)",
            appointment.time
        ))
    })?;

    let available = state
        .bookings
        .check_availability(&appointment.date, &appointment.time)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "availability check failed");
            AppError::ExternalService(format!(
                "We couldn't check that time. Please try again or contact us at {}",
                state.config.contact_email
            ))
        })?;
    if !available {
        return Err(AppError::Validation(format!(
            "{} on {} is no longer available. Please pick another time.",
            appointment.time, appointment.date
        )));
    }

    let id = state.bookings.book(&appointment).await.map_err(|e| {
        tracing::error!(error = %e, "direct booking failed");
        AppError::ExternalService(format!(
            "We couldn't book your appointment. Please try again or contact us at {}",
            state.config.contact_email
        ))
    })?;

    Ok(Json(CreateAppointmentResponse {
        calendar_url: format!("/calendar/{id}.ics"),
        id,
        status: appointment.status.as_str().to_string(),
        message: "Your appointment has been booked. We'll send you a confirmation email shortly."
            .to_string(),
    }))
}
