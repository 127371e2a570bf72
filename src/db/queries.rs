use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Appointment, AppointmentStatus, EstimateRequest, EstimateResult, StoredAppointment,
    StoredCareerApplication, StoredEstimate,
};

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn now_str() -> String {
    Utc::now().naive_utc().format(TS_FORMAT).to_string()
}

fn parse_ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, TS_FORMAT).unwrap_or_else(|_| Utc::now().naive_utc())
}

// ── Appointments ──

const APPOINTMENT_COLUMNS: &str =
    "id, name, email, phone, date, time, service, message, status, created_at, updated_at";

pub fn create_appointment(
    conn: &Connection,
    id: &str,
    appointment: &Appointment,
) -> anyhow::Result<()> {
    let now = now_str();
    conn.execute(
        "INSERT INTO appointments (id, name, email, phone, date, time, service, message, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id,
            appointment.name,
            appointment.email,
            appointment.phone,
            appointment.date,
            appointment.time,
            appointment.service,
            appointment.message,
            appointment.status.as_str(),
            now,
            now,
        ],
    )?;
    Ok(())
}

pub fn get_appointment_by_id(
    conn: &Connection,
    id: &str,
) -> anyhow::Result<Option<StoredAppointment>> {
    let result = conn.query_row(
        &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
        params![id],
        parse_appointment_row,
    );

    match result {
        Ok(appointment) => Ok(Some(appointment)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_appointments(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<StoredAppointment>> {
    let mut appointments = vec![];
    match status_filter {
        Some(status) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE status = ?1 ORDER BY date DESC, time DESC LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![status, limit], parse_appointment_row)?;
            for row in rows {
                appointments.push(row?);
            }
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments ORDER BY date DESC, time DESC LIMIT ?1"
            ))?;
            let rows = stmt.query_map(params![limit], parse_appointment_row)?;
            for row in rows {
                appointments.push(row?);
            }
        }
    }
    Ok(appointments)
}

pub fn update_appointment_status(
    conn: &Connection,
    id: &str,
    status: &AppointmentStatus,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE appointments SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now_str(), id],
    )?;
    Ok(count > 0)
}

fn parse_appointment_row(row: &rusqlite::Row) -> rusqlite::Result<StoredAppointment> {
    let status: String = row.get(8)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(StoredAppointment {
        id: row.get(0)?,
        appointment: Appointment {
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            date: row.get(4)?,
            time: row.get(5)?,
            service: row.get(6)?,
            message: row.get(7)?,
            status: AppointmentStatus::parse(&status),
        },
        created_at: parse_ts(&created_at),
        updated_at: parse_ts(&updated_at),
    })
}

// ── Project estimates ──

pub fn create_estimate(
    conn: &Connection,
    id: &str,
    request: &EstimateRequest,
    estimate: &EstimateResult,
    source: &str,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO project_estimates (id, email, request, estimate, status, source, created_at)
         VALUES (?1, ?2, ?3, ?4, 'new', ?5, ?6)",
        params![
            id,
            request.email.trim().to_lowercase(),
            serde_json::to_string(request)?,
            serde_json::to_string(estimate)?,
            source,
            now_str(),
        ],
    )?;
    Ok(())
}

pub fn get_estimates(conn: &Connection, limit: Option<i64>) -> anyhow::Result<Vec<StoredEstimate>> {
    // LIMIT -1 means no limit in SQLite
    let mut stmt = conn.prepare(
        "SELECT id, request, estimate, status, source, created_at FROM project_estimates
         ORDER BY created_at DESC, rowid DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit.unwrap_or(-1)], estimate_columns)?;
    collect_estimates(rows)
}

pub fn get_estimates_by_email(conn: &Connection, email: &str) -> anyhow::Result<Vec<StoredEstimate>> {
    let mut stmt = conn.prepare(
        "SELECT id, request, estimate, status, source, created_at FROM project_estimates
         WHERE email = ?1 ORDER BY created_at DESC, rowid DESC",
    )?;
    let rows = stmt.query_map(params![email.trim().to_lowercase()], estimate_columns)?;
    collect_estimates(rows)
}

type EstimateColumns = (String, String, String, String, String, String);

fn estimate_columns(row: &rusqlite::Row) -> rusqlite::Result<EstimateColumns> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn collect_estimates(
    rows: impl Iterator<Item = rusqlite::Result<EstimateColumns>>,
) -> anyhow::Result<Vec<StoredEstimate>> {
    let mut estimates = vec![];
    for row in rows {
        let (id, request_json, estimate_json, status, source, created_at) = row?;
        estimates.push(StoredEstimate {
            id,
            request: serde_json::from_str(&request_json)?,
            estimate: serde_json::from_str(&estimate_json)?,
            status,
            source,
            created_at: parse_ts(&created_at),
        });
    }
    Ok(estimates)
}

// ── Careers ──

pub fn create_career_application(
    conn: &Connection,
    application: &StoredCareerApplication,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO career_applications (id, name, email, resume_path, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            application.id,
            application.name,
            application.email,
            application.resume_path,
            application.submitted_at.format(TS_FORMAT).to_string(),
        ],
    )?;
    Ok(())
}

pub fn count_career_applications(conn: &Connection) -> anyhow::Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM career_applications", [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
