use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One appointment field collected from conversational input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Name,
    Email,
    Service,
    Date,
    Time,
}

impl Slot {
    pub const ORDER: [Slot; 5] = [Slot::Name, Slot::Email, Slot::Service, Slot::Date, Slot::Time];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Name => "name",
            Slot::Email => "email",
            Slot::Service => "service",
            Slot::Date => "date",
            Slot::Time => "time",
        }
    }

    /// The slot collected after this one, `None` after the last.
    pub fn next(&self) -> Option<Slot> {
        match self {
            Slot::Name => Some(Slot::Email),
            Slot::Email => Some(Slot::Service),
            Slot::Service => Some(Slot::Date),
            Slot::Date => Some(Slot::Time),
            Slot::Time => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "slot")]
pub enum DialogueState {
    Idle,
    Collecting(Slot),
    ReadyToConfirm,
    Submitting,
    Done,
}

impl DialogueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DialogueState::Idle => "idle",
            DialogueState::Collecting(Slot::Name) => "collecting_name",
            DialogueState::Collecting(Slot::Email) => "collecting_email",
            DialogueState::Collecting(Slot::Service) => "collecting_service",
            DialogueState::Collecting(Slot::Date) => "collecting_date",
            DialogueState::Collecting(Slot::Time) => "collecting_time",
            DialogueState::ReadyToConfirm => "ready_to_confirm",
            DialogueState::Submitting => "submitting",
            DialogueState::Done => "done",
        }
    }
}

/// Which widget a reply is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Chat,
    Voice,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Chat => "chat",
            Channel::Voice => "voice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: NaiveDateTime,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, sender: Sender) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: chrono::Utc::now().naive_utc(),
        }
    }
}
