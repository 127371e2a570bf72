//! Appointment slot-filling dialogue shared by the chat and voice assistants.
//!
//! While idle every utterance goes through the FAQ rules; the booking topic
//! switches into slot collection. Slots are filled strictly in order and a
//! slot only advances after its extractor matched.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::errors::AppError;
use crate::models::{Appointment, Channel, DialogueState, DraftAppointment, Slot};
use crate::services::faq::{FaqBook, Topic};
use crate::services::slots::{self, BOOKABLE_SERVICES};

static CANCEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:cancel|stop|never\s?mind|forget it)\b").expect("invalid cancel regex")
});
/// A reply that is nothing but a cancel phrase.
static CANCEL_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:please\s+)?(?:cancel|stop|never\s?mind|forget it)(?:\s+(?:it|that|the booking|please))?\s*[.!]*\s*$",
    )
    .expect("invalid cancel regex")
});
static LEADING_DECLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:no|nope|nah|cancel|don'?t|do not|never\s?mind)\b")
        .expect("invalid decline regex")
});
static DECLINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:no|nope|cancel|don'?t|never\s?mind)\b").expect("invalid decline regex")
});
static COURTESY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bno\s+(?:problem|rush|worries|hurry)\b").expect("invalid courtesy regex")
});
static CONFIRM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:yes|yeah|yep|confirm|book it|sure|sounds good|ok|okay)\b")
        .expect("invalid confirm regex")
});

/// What the caller should do with an utterance's outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Reply(String),
    /// The draft is complete and confirmed; hand it to the booking collaborator.
    Submit(Appointment),
}

#[derive(Debug, Clone)]
pub struct Dialogue {
    channel: Channel,
    state: DialogueState,
    draft: DraftAppointment,
}

impl Dialogue {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            state: DialogueState::Idle,
            draft: DraftAppointment::default(),
        }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn state(&self) -> DialogueState {
        self.state
    }

    pub fn draft(&self) -> &DraftAppointment {
        &self.draft
    }

    pub fn reset(&mut self) {
        self.state = DialogueState::Idle;
        self.draft = DraftAppointment::default();
    }

    pub fn respond(&mut self, faq: &FaqBook, utterance: &str, today: NaiveDate) -> Step {
        let utterance = utterance.trim();
        match self.state {
            DialogueState::Idle | DialogueState::Done => self.respond_idle(faq, utterance),
            DialogueState::Collecting(slot) => self.respond_collecting(slot, utterance, today),
            DialogueState::ReadyToConfirm => self.respond_confirming(utterance),
            DialogueState::Submitting => {
                Step::Reply("I'm still booking your appointment, one moment please.".to_string())
            }
        }
    }

    fn respond_idle(&mut self, faq: &FaqBook, utterance: &str) -> Step {
        let topic = faq.dispatch(utterance);
        if topic == Topic::Booking {
            self.draft = DraftAppointment::default();
            self.state = DialogueState::Collecting(Slot::Name);
        }
        Step::Reply(faq.answer(topic, self.channel, utterance))
    }

    fn respond_collecting(&mut self, slot: Slot, utterance: &str, today: NaiveDate) -> Step {
        if CANCEL_ONLY_RE.is_match(utterance) {
            self.reset();
            return Step::Reply(cancelled_message());
        }

        let Some(value) = slots::extract(slot, utterance, today) else {
            if CANCEL_RE.is_match(utterance) {
                self.reset();
                return Step::Reply(cancelled_message());
            }
            return Step::Reply(clarification(slot));
        };

        self.draft.set(slot, value.clone());
        self.state = match slot.next() {
            Some(next) => DialogueState::Collecting(next),
            None => DialogueState::ReadyToConfirm,
        };
        Step::Reply(self.acknowledge(slot, &value))
    }

    /// A leading decline wins; otherwise any confirmation wins over a
    /// stray "no" or "don't" later in the reply.
    fn respond_confirming(&mut self, utterance: &str) -> Step {
        let utterance = COURTESY_RE.replace_all(utterance, "");
        let declined = LEADING_DECLINE_RE.is_match(&utterance)
            || (!CONFIRM_RE.is_match(&utterance) && DECLINE_RE.is_match(&utterance));
        if declined {
            self.reset();
            return Step::Reply(cancelled_message());
        }
        if !CONFIRM_RE.is_match(&utterance) {
            return Step::Reply(format!(
                "Should I book this appointment for {} at {}? Please say yes to confirm or no to cancel.",
                self.draft.date.as_deref().unwrap_or_default(),
                self.draft.time.as_deref().unwrap_or_default(),
            ));
        }

        match self.draft.to_appointment() {
            Ok(appointment) => {
                self.state = DialogueState::Submitting;
                Step::Submit(appointment)
            }
            Err(e) => {
                let first_missing = Slot::ORDER
                    .into_iter()
                    .find(|slot| self.draft.get(*slot).is_none())
                    .unwrap_or(Slot::Email);
                self.state = DialogueState::Collecting(first_missing);
                let detail = match e {
                    AppError::Validation(msg) => msg,
                    other => other.to_string(),
                };
                Step::Reply(format!("{detail} {}", clarification(first_missing)))
            }
        }
    }

    /// Go back to collecting one slot, e.g. when the chosen time is taken.
    pub fn reopen(&mut self, slot: Slot) {
        let field = match slot {
            Slot::Name => &mut self.draft.name,
            Slot::Email => &mut self.draft.email,
            Slot::Service => &mut self.draft.service,
            Slot::Date => &mut self.draft.date,
            Slot::Time => &mut self.draft.time,
        };
        *field = None;
        self.state = DialogueState::Collecting(slot);
    }

    /// Close out a submission and return to idle. No retry on failure.
    pub fn finish(&mut self, faq: &FaqBook, outcome: &anyhow::Result<String>) -> String {
        let message = match outcome {
            Ok(_) => {
                self.state = DialogueState::Done;
                format!(
                    "Great! Your appointment has been booked for {} at {}. We'll send a confirmation email to {}. Is there anything else I can help you with?",
                    self.draft.date.as_deref().unwrap_or_default(),
                    self.draft.time.as_deref().unwrap_or_default(),
                    self.draft.email.as_deref().unwrap_or_default(),
                )
            }
            Err(_) => faq.booking_failed(self.channel),
        };
        self.reset();
        message
    }

    fn acknowledge(&self, slot: Slot, value: &str) -> String {
        match slot {
            Slot::Name => format!("Nice to meet you, {value}. What's your email address?"),
            Slot::Email => format!(
                "Got it. Your email is {value}. What service are you interested in? {}",
                service_options()
            ),
            Slot::Service => format!(
                "Perfect. You're interested in {value}. What date would you like to schedule? You can say today, tomorrow, or a date like 2025-06-20."
            ),
            Slot::Date => format!(
                "Great, {value} works. What time would you prefer? We're available from 9 AM to 6 PM."
            ),
            Slot::Time => format!(
                "Perfect. I have you scheduled for {} on {} at {value}. Should I book this appointment?",
                self.draft.service.as_deref().unwrap_or("a consultation"),
                self.draft.date.as_deref().unwrap_or_default(),
            ),
        }
    }
}

fn service_options() -> String {
    let names: Vec<&str> = BOOKABLE_SERVICES.iter().map(|(_, display)| *display).collect();
    format!("Options are: {}.", names.join(", "))
}

fn clarification(slot: Slot) -> String {
    match slot {
        Slot::Name => "I didn't catch your name. Could you tell me your full name?".to_string(),
        Slot::Email => {
            "I couldn't find an email address in that. Please tell me your email, for example name@example.com.".to_string()
        }
        Slot::Service => format!("Which service are you interested in? {}", service_options()),
        Slot::Date => {
            "What date works for you? Please say today, tomorrow, or a date like 2025-06-20.".to_string()
        }
        Slot::Time => "What time would you prefer? For example, 10 am or 2:30 pm.".to_string(),
    }
}

fn cancelled_message() -> String {
    "No problem, I've stopped the booking. Is there anything else I can help you with?".to_string()
}
