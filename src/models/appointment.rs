use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{is_valid_email, Slot};

pub const DEFAULT_SERVICE: &str = "Consultation";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => AppointmentStatus::Confirmed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Pending,
        }
    }
}

/// A complete appointment, ready for the booking collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub service: String,
    pub message: Option<String>,
    pub status: AppointmentStatus,
}

/// An appointment being filled in one field at a time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DraftAppointment {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub message: Option<String>,
}

impl DraftAppointment {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        let value = match slot {
            Slot::Name => &self.name,
            Slot::Email => &self.email,
            Slot::Service => &self.service,
            Slot::Date => &self.date,
            Slot::Time => &self.time,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, slot: Slot, value: String) {
        let field = match slot {
            Slot::Name => &mut self.name,
            Slot::Email => &mut self.email,
            Slot::Service => &mut self.service,
            Slot::Date => &mut self.date,
            Slot::Time => &mut self.time,
        };
        *field = Some(value);
    }

    /// Required fields that are still empty, in collection order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [Slot::Name, Slot::Email, Slot::Date, Slot::Time]
            .into_iter()
            .filter(|slot| self.get(*slot).is_none())
            .map(|slot| slot.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == DraftAppointment::default()
    }

    /// Freeze the draft. Name, email, date and time must all be present.
    pub fn to_appointment(&self) -> Result<Appointment, AppError> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in all required fields (name, email, date, and time). Missing: {}",
                missing.join(", ")
            )));
        }

        let email = self.email.as_deref().unwrap_or_default().trim().to_string();
        if !is_valid_email(&email) {
            return Err(AppError::Validation(format!(
                "'{email}' is not a valid email address"
            )));
        }

        Ok(Appointment {
            name: self.name.as_deref().unwrap_or_default().trim().to_string(),
            email,
            phone: self.phone.clone().unwrap_or_default(),
            date: self.date.clone().unwrap_or_default(),
            time: self.time.clone().unwrap_or_default(),
            service: self
                .get(Slot::Service)
                .unwrap_or(DEFAULT_SERVICE)
                .to_string(),
            message: self.message.clone().filter(|m| !m.trim().is_empty()),
            status: AppointmentStatus::Pending,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAppointment {
    pub id: String,
    #[serde(flatten)]
    pub appointment: Appointment,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
