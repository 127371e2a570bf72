use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{AppointmentStatus, StoredAppointment, StoredEstimate};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;

pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/estimates
#[derive(Deserialize)]
pub struct EstimatesQuery {
    pub limit: Option<i64>,
    pub email: Option<String>,
}

pub async fn get_estimates(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<EstimatesQuery>,
) -> Result<Json<Vec<StoredEstimate>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let estimates = match query.email.as_deref().filter(|e| !e.trim().is_empty()) {
        Some(email) => state.estimates.by_email(email).await?,
        None => state.estimates.list(query.limit).await?,
    };
    Ok(Json(estimates))
}

// GET /api/admin/appointments
#[derive(Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn get_appointments(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<Vec<StoredAppointment>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    let appointments = {
        let db = state.db.lock().unwrap();
        queries::get_all_appointments(&db, query.status.as_deref(), limit)?
    };
    Ok(Json(appointments))
}

// POST /api/admin/appointments/:id/cancel
#[derive(Serialize)]
pub struct CancelResponse {
    ok: bool,
    status: AppointmentStatus,
}

pub async fn cancel_appointment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_appointment_status(&db, &id, &AppointmentStatus::Cancelled)?
    };

    if !updated {
        return Err(AppError::NotFound(format!("appointment {id}")));
    }
    tracing::info!(appointment = %id, "appointment cancelled by admin");
    Ok(Json(CancelResponse {
        ok: true,
        status: AppointmentStatus::Cancelled,
    }))
}
