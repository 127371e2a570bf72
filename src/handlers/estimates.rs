use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{EstimateRequest, EstimateResult, ProjectFeature};
use crate::services::estimate::{
    calculate_project_estimate, project_features, validate_for_calculation,
    validate_for_submission,
};
use crate::state::AppState;

// GET /api/estimates/features
pub async fn list_features() -> Json<&'static [ProjectFeature]> {
    Json(project_features())
}

// POST /api/estimates/calculate
pub async fn calculate(Json(request): Json<EstimateRequest>) -> Result<Json<EstimateResult>, AppError> {
    validate_for_calculation(&request)?;
    Ok(Json(calculate_project_estimate(&request)))
}

// POST /api/estimates
#[derive(Serialize)]
pub struct SubmitEstimateResponse {
    id: String,
    estimate: EstimateResult,
    message: String,
}

pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<SubmitEstimateResponse>, AppError> {
    validate_for_submission(&request)?;

    let estimate = calculate_project_estimate(&request);
    let id = state.estimates.submit(&request, &estimate).await.map_err(|e| {
        tracing::error!(error = %e, "estimate submission failed");
        AppError::ExternalService(format!(
            "We couldn't submit your estimate. Please try again or contact us at {}",
            state.config.contact_email
        ))
    })?;

    Ok(Json(SubmitEstimateResponse {
        id,
        estimate,
        message: "Estimate submitted! We'll contact you within 24 hours to discuss your project."
            .to_string(),
    }))
}
