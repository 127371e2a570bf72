//! Speech plumbing for the voice assistant.
//!
//! Recognition arrives as a stream of [`Recognition`] events and replies leave
//! through a [`SpeechSink`]. Neither side knows which engine is behind it.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio_stream::{Stream, StreamExt};

use crate::services::assistant::Assistant;
use crate::services::booking::BookingService;
use crate::services::faq::FaqBook;

pub const DIDNT_CATCH_THAT: &str = "Sorry, I didn't catch that. Could you please try again?";

/// One event from a speech recogniser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Recognition {
    /// Partial hypothesis, shown to the visitor but never acted on.
    Interim(String),
    Final(String),
    /// The recogniser gave up, e.g. "no-speech" or "network".
    Error(String),
}

#[async_trait]
pub trait SpeechSink: Send + Sync {
    async fn speak(&self, text: &str) -> anyhow::Result<()>;
}

static MARKDOWN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*|__|`|#+\s").expect("invalid markdown regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*(?:[•\-*]|\d+\.)\s+").expect("invalid bullet regex"));
static PUNCT_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.?!,:])\s+").expect("invalid punctuation regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("invalid whitespace regex"));

/// Normalise a reply for a speech synthesiser: markdown markers and bullets
/// go, whitespace collapses to single spaces.
pub fn prepare_for_speech(text: &str) -> String {
    let text = BULLET_RE.replace_all(text, "");
    let text = MARKDOWN_RE.replace_all(&text, "");
    let text = PUNCT_SPACE_RE.replace_all(&text, "$1 ");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Drive a voice session from a transcript stream until the stream ends.
pub async fn run_voice_loop<S>(
    assistant: &mut Assistant,
    faq: &FaqBook,
    booking: &dyn BookingService,
    mut events: S,
    sink: &dyn SpeechSink,
) where
    S: Stream<Item = Recognition> + Unpin + Send,
{
    while let Some(event) = events.next().await {
        let today = chrono::Local::now().date_naive();
        for reply in assistant.recognize(faq, booking, event, today).await {
            if let Err(e) = sink.speak(&prepare_for_speech(&reply)).await {
                tracing::warn!(session = %assistant.id(), error = %e, "failed to speak reply");
            }
        }
    }
    tracing::debug!(session = %assistant.id(), "transcript stream ended");
}
