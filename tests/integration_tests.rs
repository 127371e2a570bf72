use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use tower::ServiceExt;

use agencysite::config::AppConfig;
use agencysite::db;
use agencysite::handlers;
use agencysite::services::booking::SqliteBookingService;
use agencysite::services::email::{EmailNotifier, TemplateParams};
use agencysite::models::{EstimateRequest, EstimateResult, StoredEstimate};
use agencysite::services::estimate_store::{EstimateService, SqliteEstimateService};
use agencysite::services::faq::{BusinessProfile, FaqBook};
use agencysite::services::sessions::SessionRegistry;
use agencysite::state::AppState;

// ── Mock Notifier ──

struct MockNotifier {
    sent: Arc<Mutex<Vec<TemplateParams>>>,
}

#[async_trait]
impl EmailNotifier for MockNotifier {
    async fn send(&self, params: &TemplateParams) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(params.clone());
        Ok(())
    }
}

// ── Failing Estimate Store ──

struct FailingEstimates;

#[async_trait]
impl EstimateService for FailingEstimates {
    async fn submit(&self, _request: &EstimateRequest, _estimate: &EstimateResult) -> anyhow::Result<String> {
        anyhow::bail!("database is locked")
    }

    async fn list(&self, _limit: Option<i64>) -> anyhow::Result<Vec<StoredEstimate>> {
        Ok(vec![])
    }

    async fn by_email(&self, _email: &str) -> anyhow::Result<Vec<StoredEstimate>> {
        Ok(vec![])
    }
}

// ── Helpers ──

fn test_config(resume_dir: &str) -> AppConfig {
    AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
        admin_token: "test-token".to_string(),
        business_name: "Acme Studio".to_string(),
        contact_email: "hello@acme.test".to_string(),
        business_website: "acme.test".to_string(),
        emailjs_service_id: String::new(),
        emailjs_template_id: String::new(),
        emailjs_public_key: String::new(),
        emailjs_private_key: None,
        resume_dir: resume_dir.to_string(),
        typing_delay_ms: 0,
        allowed_origin: None,
    }
}

fn build_state(
    resume_dir: &str,
    notifier: Option<Arc<dyn EmailNotifier>>,
) -> Arc<AppState> {
    build_state_with(resume_dir, notifier, |db| {
        Box::new(SqliteEstimateService::new(Arc::clone(db)))
    })
}

fn build_state_with(
    resume_dir: &str,
    notifier: Option<Arc<dyn EmailNotifier>>,
    estimates: impl FnOnce(&db::Db) -> Box<dyn EstimateService>,
) -> Arc<AppState> {
    let config = test_config(resume_dir);
    let db = db::open_shared(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::clone(&db),
        faq: FaqBook::new(BusinessProfile::from_config(&config)),
        bookings: Box::new(SqliteBookingService::new(
            Arc::clone(&db),
            notifier.clone(),
            config.business_name.clone(),
        )),
        estimates: estimates(&db),
        notifier,
        sessions: SessionRegistry::default(),
        config,
    })
}

fn test_state() -> Arc<AppState> {
    build_state("unused-resume-dir", None)
}

fn test_state_with_sent() -> (Arc<AppState>, Arc<Mutex<Vec<TemplateParams>>>) {
    let sent = Arc::new(Mutex::new(vec![]));
    let notifier = MockNotifier {
        sent: Arc::clone(&sent),
    };
    (build_state("unused-resume-dir", Some(Arc::new(notifier))), sent)
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", "Bearer test-token")
        .body(Body::empty())
        .unwrap()
}

async fn read_json(res: Response<Body>) -> Value {
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> Response<Body> {
    handlers::router(state.clone()).oneshot(req).await.unwrap()
}

fn appointment_body() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "phone": "+15550001111",
        "service": "AI Chatbot",
        "date": "2025-06-20",
        "time": "14:00",
        "message": "Support bot for our shop"
    })
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(read_json(res).await["status"], "ok");
}

// ── Estimates ──

#[tokio::test]
async fn test_feature_catalog() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder()
            .uri("/api/estimates/features")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let json = read_json(res).await;
    let features = json.as_array().unwrap();
    assert_eq!(features.len(), 10);
    assert_eq!(features[0]["id"], "responsive-design");
}

#[tokio::test]
async fn test_calculate_estimate() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/estimates/calculate",
            json!({"project_type": "website", "complexity": "simple"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = read_json(res).await;
    assert_eq!(json["hours"], 25);
    assert_eq!(json["cost"], 625);
    assert_eq!(json["timeline"], "1-2 weeks");
}

#[tokio::test]
async fn test_calculate_requires_project_type_and_complexity() {
    let state = test_state();
    let res = send(
        &state,
        json_request("POST", "/api/estimates/calculate", json!({"project_type": "website"})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(res).await["error"],
        "Please select project type and complexity level."
    );
}

#[tokio::test]
async fn test_submit_estimate_and_admin_lookup() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/estimates",
            json!({
                "project_type": "web-app",
                "complexity": "medium",
                "features": ["user-auth", "payment-gateway", "user-auth"],
                "name": "Grace",
                "email": "Grace@Example.com"
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let submitted = read_json(res).await;
    assert!(submitted["id"].as_str().is_some());

    let res = send(
        &state,
        admin_request("GET", "/api/admin/estimates?email=grace@example.com"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = read_json(res).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["status"], "new");
    assert_eq!(list[0]["source"], "website-calculator");
    assert_eq!(list[0]["request"]["features"].as_array().unwrap().len(), 2);
    assert_eq!(list[0]["estimate"], submitted["estimate"]);
}

#[tokio::test]
async fn test_submit_estimate_requires_contact_details() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/estimates",
            json!({"project_type": "website", "complexity": "simple", "name": "Grace"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_estimate_store_failure_offers_contact() {
    let state = build_state_with("unused-resume-dir", None, |_| Box::new(FailingEstimates));
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/estimates",
            json!({
                "project_type": "website",
                "complexity": "simple",
                "name": "Grace",
                "email": "grace@example.com"
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let json = read_json(res).await;
    let error = json["error"].as_str().unwrap();
    assert!(error.contains("hello@acme.test"));
    assert!(!error.contains("database is locked"));
}

// ── Admin auth ──

#[tokio::test]
async fn test_admin_requires_auth() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder()
            .uri("/api/admin/appointments")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_wrong_token() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder()
            .uri("/api/admin/estimates")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

// ── Appointments ──

#[tokio::test]
async fn test_time_slots() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder()
            .uri("/api/appointments/slots?date=2025-06-20")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    let json = read_json(res).await;
    assert_eq!(json["date"], "2025-06-20");
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.first().unwrap(), "09:00");
    assert_eq!(slots.last().unwrap(), "17:30");
}

#[tokio::test]
async fn test_book_list_cancel_and_download() {
    let (state, sent) = test_state_with_sent();

    let res = send(&state, json_request("POST", "/api/appointments", appointment_body())).await;
    assert_eq!(res.status(), StatusCode::OK);
    let booked = read_json(res).await;
    assert_eq!(booked["status"], "pending");
    let id = booked["id"].as_str().unwrap().to_string();
    assert_eq!(booked["calendar_url"], format!("/calendar/{id}.ics"));

    {
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["date"], "2025-06-20");
        assert_eq!(sent[0]["from_email"], "ada@example.com");
    }

    let res = send(&state, admin_request("GET", "/api/admin/appointments?status=pending")).await;
    let json = read_json(res).await;
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["service"], "AI Chatbot");

    let res = send(
        &state,
        Request::builder()
            .uri(format!("/calendar/{id}.ics"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/calendar; charset=utf-8"
    );
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let ics = String::from_utf8(body.to_vec()).unwrap();
    assert!(ics.contains("DTSTART:20250620T140000"));
    assert!(ics.contains("SUMMARY:AI Chatbot with Acme Studio"));

    let res = send(
        &state,
        admin_request("POST", &format!("/api/admin/appointments/{id}/cancel")),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = send(&state, admin_request("GET", "/api/admin/appointments?status=pending")).await;
    assert!(read_json(res).await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_booking_missing_fields_rejected() {
    let state = test_state();
    let mut body = appointment_body();
    body["time"] = json!("");
    let res = send(&state, json_request("POST", "/api/appointments", body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let json = read_json(res).await;
    assert!(json["error"].as_str().unwrap().contains("Missing: time"));
}

#[tokio::test]
async fn test_booking_without_email_config_still_succeeds() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/api/appointments", appointment_body())).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cancel_unknown_appointment() {
    let state = test_state();
    let res = send(
        &state,
        admin_request("POST", "/api/admin/appointments/nope/cancel"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_not_found() {
    let state = test_state();
    let res = send(
        &state,
        Request::builder()
            .uri("/calendar/nonexistent.ics")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// ── Contact & careers ──

#[tokio::test]
async fn test_contact_falls_back_to_mailto_when_unconfigured() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/contact",
            json!({"name": "Ada", "email": "ada@example.com", "message": "Hello there"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let json = read_json(res).await;
    assert_eq!(json["delivered"], false);
    assert!(json["fallback_mailto"]
        .as_str()
        .unwrap()
        .starts_with("mailto:hello@acme.test?"));
}

#[tokio::test]
async fn test_contact_delivered_when_configured() {
    let (state, sent) = test_state_with_sent();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/contact",
            json!({"name": "Ada", "email": "ada@example.com", "message": "Hello there"}),
        ),
    )
    .await;
    let json = read_json(res).await;
    assert_eq!(json["delivered"], true);
    assert!(json.get("fallback_mailto").is_none());
    assert_eq!(sent.lock().unwrap()[0]["message"], "Hello there");
}

#[tokio::test]
async fn test_contact_rejects_invalid_email() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/contact",
            json!({"name": "Ada", "email": "ada-at-example", "message": "Hi"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_career_application_stores_resume() {
    let dir = tempfile::tempdir().unwrap();
    let state = build_state(dir.path().to_str().unwrap(), None);

    let res = send(
        &state,
        json_request(
            "POST",
            "/api/careers",
            json!({
                "name": "Ada",
                "email": "ada@example.com",
                "resume": {"file_name": "Ada CV.pdf", "content_base64": BASE64.encode(b"%PDF-1.7")}
            }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn test_career_application_requires_resume() {
    let state = test_state();
    let res = send(
        &state,
        json_request(
            "POST",
            "/api/careers",
            json!({"name": "Ada", "email": "ada@example.com"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(res).await["error"],
        "All fields are required: name, email, and resume"
    );
}

// ── Chat & voice sessions ──

async fn chat(state: &Arc<AppState>, id: &str, message: &str) -> Value {
    let res = send(
        state,
        json_request(
            "POST",
            &format!("/api/chat/sessions/{id}/messages"),
            json!({ "message": message }),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK, "message {message:?}");
    read_json(res).await
}

#[tokio::test]
async fn test_chat_session_books_appointment() {
    let (state, sent) = test_state_with_sent();

    let res = send(&state, json_request("POST", "/api/chat/sessions", json!({}))).await;
    let opened = read_json(res).await;
    assert!(opened["greeting"]
        .as_str()
        .unwrap()
        .starts_with("Hello! I'm Acme Studio's AI assistant."));
    assert!(opened.get("speech").is_none());
    let id = opened["session_id"].as_str().unwrap().to_string();

    let json = chat(&state, &id, "Tell me about your company").await;
    assert_eq!(json["state"], "idle");
    assert!(json["replies"][0]
        .as_str()
        .unwrap()
        .contains("Acme Studio is an AI solutions agency"));

    let json = chat(&state, &id, "I want to book an appointment").await;
    assert_eq!(json["state"], "collecting_name");

    chat(&state, &id, "My name is Ada Lovelace").await;
    chat(&state, &id, "ada@example.com").await;
    chat(&state, &id, "consultation").await;
    chat(&state, &id, "2025-06-20").await;
    let json = chat(&state, &id, "10:30 am").await;
    assert_eq!(json["state"], "ready_to_confirm");

    let json = chat(&state, &id, "yes").await;
    assert_eq!(json["state"], "idle");
    assert_eq!(json["replies"][0], "Booking your appointment...");
    assert!(json["replies"][1]
        .as_str()
        .unwrap()
        .contains("booked for 2025-06-20 at 10:30"));
    assert_eq!(sent.lock().unwrap()[0]["service"], "Consultation");

    let res = send(
        &state,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = send(
        &state,
        json_request(
            "POST",
            &format!("/api/chat/sessions/{id}/messages"),
            json!({"message": "hello"}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/api/chat/sessions", json!({}))).await;
    let id = read_json(res).await["session_id"].as_str().unwrap().to_string();

    let res = send(
        &state,
        json_request(
            "POST",
            &format!("/api/chat/sessions/{id}/messages"),
            json!({"message": "   "}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_voice_session_transcripts() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/api/voice/sessions", json!({}))).await;
    let opened = read_json(res).await;
    assert!(opened["speech"].as_str().is_some());
    let id = opened["session_id"].as_str().unwrap().to_string();
    let uri = format!("/api/voice/sessions/{id}/transcripts");

    let res = send(
        &state,
        json_request("POST", &uri, json!({"kind": "interim", "text": "tell me ab"})),
    )
    .await;
    let json = read_json(res).await;
    assert!(json["replies"].as_array().unwrap().is_empty());

    let res = send(
        &state,
        json_request("POST", &uri, json!({"kind": "final", "text": "what services do you offer"})),
    )
    .await;
    let json = read_json(res).await;
    let speech = json["speech"][0].as_str().unwrap();
    assert!(speech.starts_with("We specialize in AI agents and workflows."));
    assert!(!speech.contains("**"));

    let res = send(
        &state,
        json_request("POST", &uri, json!({"kind": "error", "text": "network"})),
    )
    .await;
    let json = read_json(res).await;
    assert_eq!(
        json["replies"][0],
        "Sorry, I didn't catch that. Could you please try again?"
    );
    assert_eq!(json["state"], "idle");
}

#[tokio::test]
async fn test_voice_empty_final_transcript_rejected() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/api/voice/sessions", json!({}))).await;
    let id = read_json(res).await["session_id"].as_str().unwrap().to_string();

    let res = send(
        &state,
        json_request(
            "POST",
            &format!("/api/voice/sessions/{id}/transcripts"),
            json!({"kind": "final", "text": "   "}),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_chat_session_is_not_a_voice_session() {
    let state = test_state();
    let res = send(&state, json_request("POST", "/api/chat/sessions", json!({}))).await;
    let id = read_json(res).await["session_id"].as_str().unwrap().to_string();

    let res = send(
        &state,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/voice/sessions/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
