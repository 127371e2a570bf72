use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use crate::db::{queries, Db};
use crate::models::Appointment;
use crate::services::email::{EmailNotifier, TemplateParams};

const FIRST_SLOT_HOUR: u32 = 9;
const LAST_SLOT_HOUR: u32 = 17;

#[async_trait]
pub trait BookingService: Send + Sync {
    /// Store a booking and return its id.
    async fn book(&self, appointment: &Appointment) -> anyhow::Result<String>;

    async fn check_availability(&self, date: &str, time: &str) -> anyhow::Result<bool>;
}

/// Bookable start times for a day: 09:00 through 17:30 in 30-minute steps.
pub fn available_time_slots(_date: NaiveDate) -> Vec<String> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|hour| [0, 30].map(|minute| NaiveTime::from_hms_opt(hour, minute, 0)))
        .flatten()
        .map(|t| t.format("%H:%M").to_string())
        .collect()
}

pub struct SqliteBookingService {
    db: Db,
    notifier: Option<Arc<dyn EmailNotifier>>,
    business_name: String,
}

impl SqliteBookingService {
    pub fn new(
        db: Db,
        notifier: Option<Arc<dyn EmailNotifier>>,
        business_name: String,
    ) -> Self {
        Self {
            db,
            notifier,
            business_name,
        }
    }

    async fn notify(&self, id: &str, appointment: &Appointment) {
        let Some(notifier) = &self.notifier else {
            tracing::warn!(appointment = %id, "email not configured, skipping booking notification");
            return;
        };

        let params = booking_template_params(id, appointment, &self.business_name);
        if let Err(e) = notifier.send(&params).await {
            tracing::error!(appointment = %id, error = %e, "failed to send booking notification");
        }
    }
}

#[async_trait]
impl BookingService for SqliteBookingService {
    async fn book(&self, appointment: &Appointment) -> anyhow::Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        {
            let db = self.db.lock().unwrap();
            queries::create_appointment(&db, &id, appointment)
                .context("failed to store appointment")?;
        }

        tracing::info!(
            appointment = %id,
            date = %appointment.date,
            time = %appointment.time,
            service = %appointment.service,
            "appointment booked"
        );

        self.notify(&id, appointment).await;
        Ok(id)
    }

    async fn check_availability(&self, _date: &str, _time: &str) -> anyhow::Result<bool> {
        // TODO: reject slots already held by a pending or confirmed appointment.
        Ok(true)
    }
}

fn booking_template_params(id: &str, appointment: &Appointment, business_name: &str) -> TemplateParams {
    let mut params = TemplateParams::new();
    params.insert("appointment_id".into(), id.to_string());
    params.insert("business_name".into(), business_name.to_string());
    params.insert("from_name".into(), appointment.name.clone());
    params.insert("from_email".into(), appointment.email.clone());
    params.insert("phone".into(), appointment.phone.clone());
    params.insert("service".into(), appointment.service.clone());
    params.insert("date".into(), appointment.date.clone());
    params.insert("time".into(), appointment.time.clone());
    params.insert(
        "message".into(),
        appointment.message.clone().unwrap_or_default(),
    );
    params.insert(
        "subject".into(),
        format!("New appointment: {} on {} at {}", appointment.name, appointment.date, appointment.time),
    );
    params
}
