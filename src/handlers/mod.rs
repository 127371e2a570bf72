pub mod admin;
pub mod appointments;
pub mod assistant;
pub mod calendar;
pub mod estimates;
pub mod forms;
pub mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Base64 inflates a 5 MiB resume to roughly 6.7 MiB.
const CAREERS_BODY_LIMIT: usize = 8 * 1024 * 1024;

fn cors_layer(allowed_origin: Option<&str>) -> CorsLayer {
    let origin = match allowed_origin.map(str::parse::<HeaderValue>) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid ALLOWED_ORIGIN, allowing any origin");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers(Any)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.allowed_origin.as_deref());

    Router::new()
        .route("/health", get(health::health))
        .route("/api/estimates/features", get(estimates::list_features))
        .route("/api/estimates/calculate", post(estimates::calculate))
        .route("/api/estimates", post(estimates::submit))
        .route("/api/admin/estimates", get(admin::get_estimates))
        .route("/api/appointments/slots", get(appointments::get_slots))
        .route("/api/appointments", post(appointments::create_appointment))
        .route("/api/admin/appointments", get(admin::get_appointments))
        .route(
            "/api/admin/appointments/:id/cancel",
            post(admin::cancel_appointment),
        )
        .route("/calendar/:appointment_id", get(calendar::download_ics))
        .route("/api/contact", post(forms::submit_contact))
        .route(
            "/api/careers",
            post(forms::submit_career).layer(DefaultBodyLimit::max(CAREERS_BODY_LIMIT)),
        )
        .route("/api/chat/sessions", post(assistant::open_chat))
        .route(
            "/api/chat/sessions/:id/messages",
            post(assistant::send_chat_message),
        )
        .route("/api/chat/sessions/:id", delete(assistant::close_chat))
        .route("/api/voice/sessions", post(assistant::open_voice))
        .route(
            "/api/voice/sessions/:id/transcripts",
            post(assistant::push_transcript),
        )
        .route("/api/voice/sessions/:id", delete(assistant::close_voice))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
