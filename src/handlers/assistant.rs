//! Chat and voice widget sessions.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Channel;
use crate::services::speech::{prepare_for_speech, Recognition};
use crate::services::sessions::SharedAssistant;
use crate::state::AppState;

#[derive(Serialize)]
pub struct OpenSessionResponse {
    session_id: String,
    greeting: String,
    /// Speakable rendering, voice sessions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    speech: Option<String>,
}

#[derive(Serialize)]
pub struct TurnResponse {
    replies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech: Option<Vec<String>>,
    state: &'static str,
}

#[derive(Deserialize)]
pub struct ChatMessageRequest {
    pub message: String,
}

async fn open(state: &AppState, channel: Channel) -> OpenSessionResponse {
    let (session_id, assistant) = state.sessions.open(
        channel,
        &state.faq,
        Duration::from_millis(state.config.typing_delay_ms),
    );
    let greeting = assistant.lock().await.greeting().to_string();
    OpenSessionResponse {
        session_id,
        speech: (channel == Channel::Voice).then(|| prepare_for_speech(&greeting)),
        greeting,
    }
}

fn session(state: &AppState, id: &str, channel: Channel) -> Result<SharedAssistant, AppError> {
    state
        .sessions
        .get(id, channel)
        .ok_or_else(|| AppError::NotFound(format!("{} session {id}", channel.as_str())))
}

fn close(state: &AppState, id: &str, channel: Channel) -> Result<StatusCode, AppError> {
    if state.sessions.close(id, channel) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("{} session {id}", channel.as_str())))
    }
}

// POST /api/chat/sessions
pub async fn open_chat(State(state): State<Arc<AppState>>) -> Json<OpenSessionResponse> {
    Json(open(&state, Channel::Chat).await)
}

// POST /api/chat/sessions/:id/messages
pub async fn send_chat_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<ChatMessageRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if body.message.trim().is_empty() {
        return Err(AppError::Validation("Message cannot be empty.".to_string()));
    }

    let assistant = session(&state, &id, Channel::Chat)?;
    let mut assistant = assistant.lock().await;
    let today = chrono::Local::now().date_naive();
    let replies = assistant
        .handle(&state.faq, state.bookings.as_ref(), &body.message, today)
        .await;

    Ok(Json(TurnResponse {
        replies,
        speech: None,
        state: assistant.state().as_str(),
    }))
}

// DELETE /api/chat/sessions/:id
pub async fn close_chat(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    close(&state, &id, Channel::Chat)
}

// POST /api/voice/sessions
pub async fn open_voice(State(state): State<Arc<AppState>>) -> Json<OpenSessionResponse> {
    Json(open(&state, Channel::Voice).await)
}

// POST /api/voice/sessions/:id/transcripts
pub async fn push_transcript(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(event): Json<Recognition>,
) -> Result<Json<TurnResponse>, AppError> {
    if matches!(&event, Recognition::Final(text) if text.trim().is_empty()) {
        return Err(AppError::Recognition("final transcript is empty".to_string()));
    }

    let assistant = session(&state, &id, Channel::Voice)?;
    let mut assistant = assistant.lock().await;
    let today = chrono::Local::now().date_naive();
    let replies = assistant
        .recognize(&state.faq, state.bookings.as_ref(), event, today)
        .await;

    Ok(Json(TurnResponse {
        speech: Some(replies.iter().map(|r| prepare_for_speech(r)).collect()),
        replies,
        state: assistant.state().as_str(),
    }))
}

// DELETE /api/voice/sessions/:id
pub async fn close_voice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    close(&state, &id, Channel::Voice)
}
