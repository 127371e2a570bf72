use std::time::Duration;

use chrono::NaiveDate;

use crate::models::{Channel, ChatMessage, DialogueState, Sender, Slot};
use crate::services::booking::BookingService;
use crate::services::dialogue::{Dialogue, Step};
use crate::services::faq::FaqBook;
use crate::services::speech::{Recognition, DIDNT_CATCH_THAT};

/// One open chat or voice widget: its dialogue, transcript and timing.
pub struct Assistant {
    id: String,
    dialogue: Dialogue,
    transcript: Vec<ChatMessage>,
    typing_delay: Duration,
}

impl Assistant {
    /// Open a widget. The greeting is already in the transcript.
    pub fn open(channel: Channel, faq: &FaqBook, typing_delay: Duration) -> Self {
        let mut assistant = Self {
            id: uuid::Uuid::new_v4().to_string(),
            dialogue: Dialogue::new(channel),
            transcript: vec![],
            typing_delay,
        };
        assistant
            .transcript
            .push(ChatMessage::new(faq.greeting(channel), Sender::Bot));
        assistant
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channel(&self) -> Channel {
        self.dialogue.channel()
    }

    pub fn state(&self) -> DialogueState {
        self.dialogue.state()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn greeting(&self) -> &str {
        self.transcript
            .first()
            .map(|m| m.text.as_str())
            .unwrap_or_default()
    }

    /// Process one user utterance and return the bot replies in order.
    pub async fn handle(
        &mut self,
        faq: &FaqBook,
        booking: &dyn BookingService,
        utterance: &str,
        today: NaiveDate,
    ) -> Vec<String> {
        if utterance.trim().is_empty() {
            return vec![];
        }
        self.transcript.push(ChatMessage::new(utterance.trim(), Sender::User));

        let mut replies = vec![];
        match self.dialogue.respond(faq, utterance, today) {
            Step::Reply(text) => replies.push(text),
            Step::Submit(appointment) => {
                match booking
                    .check_availability(&appointment.date, &appointment.time)
                    .await
                {
                    Ok(false) => {
                        self.dialogue.reopen(Slot::Time);
                        replies.push(format!(
                            "Sorry, {} on {} is no longer available. What other time would work for you?",
                            appointment.time, appointment.date
                        ));
                    }
                    availability => {
                        replies.push(self.booking_in_progress().to_string());
                        let outcome = match availability {
                            Ok(_) => booking.book(&appointment).await,
                            Err(e) => Err(e.context("availability check failed")),
                        };
                        if let Err(e) = &outcome {
                            tracing::error!(session = %self.id, error = %e, "booking failed");
                        }
                        replies.push(self.dialogue.finish(faq, &outcome));
                    }
                }
            }
        }

        for reply in &replies {
            self.reply(reply).await;
        }

        tracing::debug!(
            session = %self.id,
            channel = self.channel().as_str(),
            state = self.state().as_str(),
            "handled utterance"
        );
        replies
    }

    /// Voice entry point. Interim hypotheses are ignored; recognition errors
    /// ask the visitor to repeat without touching the dialogue.
    pub async fn recognize(
        &mut self,
        faq: &FaqBook,
        booking: &dyn BookingService,
        event: Recognition,
        today: NaiveDate,
    ) -> Vec<String> {
        match event {
            Recognition::Interim(_) => vec![],
            Recognition::Final(text) => self.handle(faq, booking, &text, today).await,
            Recognition::Error(kind) => {
                tracing::warn!(session = %self.id, error = %kind, "speech recognition error");
                self.reply(DIDNT_CATCH_THAT).await;
                vec![DIDNT_CATCH_THAT.to_string()]
            }
        }
    }

    fn booking_in_progress(&self) -> &'static str {
        match self.channel() {
            Channel::Chat => "Booking your appointment...",
            Channel::Voice => "Booking your appointment now. Please wait a moment.",
        }
    }

    async fn reply(&mut self, text: &str) {
        if self.channel() == Channel::Chat && !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }
        self.transcript.push(ChatMessage::new(text, Sender::Bot));
    }
}
