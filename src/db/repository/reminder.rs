use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_instant, parse_instant, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::ReminderStatus;
use crate::models::Reminder;

const REMINDER_COLUMNS: &str = "id, client_id, recipient, send_at, status, appointment_id,
         request_payload, response_payload, created_at, updated_at";

pub fn insert_reminder(conn: &Connection, reminder: &Reminder) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO reminders (id, client_id, recipient, send_at, status, appointment_id,
         request_payload, response_payload, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            reminder.id.to_string(),
            reminder.client_id.to_string(),
            reminder.recipient,
            format_instant(&reminder.send_at),
            reminder.status.as_str(),
            reminder.appointment_id.map(|id| id.to_string()),
            reminder.request_payload,
            reminder.response_payload,
            format_instant(&reminder.created_at),
            format_instant(&reminder.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_reminder(conn: &Connection, id: &Uuid) -> Result<Option<Reminder>, DatabaseError> {
    let result = conn
        .prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders WHERE id = ?1"
        ))?
        .query_row(params![id.to_string()], reminder_from_row);

    match result {
        Ok(reminder) => Ok(Some(reminder)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// The reminder scheduled from a booking, if any (newest wins when an
/// appointment was rebooked with a fresh reminder).
pub fn get_reminder_by_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Option<Reminder>, DatabaseError> {
    let result = conn
        .prepare(&format!(
            "SELECT {REMINDER_COLUMNS} FROM reminders
             WHERE appointment_id = ?1
             ORDER BY created_at DESC
             LIMIT 1"
        ))?
        .query_row(params![appointment_id.to_string()], reminder_from_row);

    match result {
        Ok(reminder) => Ok(Some(reminder)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_reminders_by_client(
    conn: &Connection,
    client_id: &Uuid,
) -> Result<Vec<Reminder>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders
         WHERE client_id = ?1
         ORDER BY send_at DESC"
    ))?;

    let rows = stmt.query_map(params![client_id.to_string()], reminder_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Pending reminders whose send time has passed — the set the messaging
/// integration picks up on each delivery sweep.
pub fn list_due_reminders(
    conn: &Connection,
    now: &DateTime<Utc>,
) -> Result<Vec<Reminder>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REMINDER_COLUMNS} FROM reminders
         WHERE status = 'pending' AND send_at <= ?1
         ORDER BY send_at ASC"
    ))?;

    let rows = stmt.query_map(params![format_instant(now)], reminder_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Records a delivery outcome reported by the messaging integration.
pub fn set_reminder_status(
    conn: &Connection,
    id: &Uuid,
    status: ReminderStatus,
    response_payload: Option<&str>,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE reminders SET status = ?2, response_payload = ?3, updated_at = ?4 WHERE id = ?1",
        params![
            id.to_string(),
            status.as_str(),
            response_payload,
            format_instant(&Utc::now()),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "reminder".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn reminder_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reminder> {
    Ok(Reminder {
        id: parse_uuid(&row.get::<_, String>(0)?),
        client_id: parse_uuid(&row.get::<_, String>(1)?),
        recipient: row.get(2)?,
        send_at: parse_instant(&row.get::<_, String>(3)?),
        status: ReminderStatus::from_str(&row.get::<_, String>(4)?)
            .unwrap_or(ReminderStatus::Pending),
        appointment_id: row
            .get::<_, Option<String>>(5)?
            .map(|s| parse_uuid(&s)),
        request_payload: row.get(6)?,
        response_payload: row.get(7)?,
        created_at: parse_instant(&row.get::<_, String>(8)?),
        updated_at: parse_instant(&row.get::<_, String>(9)?),
    })
}
