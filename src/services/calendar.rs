use anyhow::Context;
use chrono::{Duration, NaiveDateTime};

use crate::models::StoredAppointment;

pub const APPOINTMENT_MINUTES: i64 = 60;

const ICS_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Escape text for an iCalendar TEXT value.
fn escape_text(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}

pub fn generate_ics(stored: &StoredAppointment, business_name: &str) -> anyhow::Result<String> {
    let appointment = &stored.appointment;
    let start = NaiveDateTime::parse_from_str(
        &format!("{} {}", appointment.date, appointment.time),
        "%Y-%m-%d %H:%M",
    )
    .with_context(|| format!("appointment {} has an invalid date or time", stored.id))?;
    let end = start + Duration::minutes(APPOINTMENT_MINUTES);

    let uid = format!("{}@agencysite", stored.id);
    let summary = escape_text(&format!("{} with {business_name}", appointment.service));
    let description = escape_text(appointment.message.as_deref().unwrap_or("No additional notes"));

    Ok(format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//{business_name}//Appointments//EN\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART:{dtstart}\r\n\
         DTEND:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         STATUS:{status}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n",
        dtstamp = stored.created_at.format(ICS_FORMAT),
        dtstart = start.format(ICS_FORMAT),
        dtend = end.format(ICS_FORMAT),
        status = match appointment.status {
            crate::models::AppointmentStatus::Cancelled => "CANCELLED",
            crate::models::AppointmentStatus::Confirmed => "CONFIRMED",
            crate::models::AppointmentStatus::Pending => "TENTATIVE",
        },
    ))
}
