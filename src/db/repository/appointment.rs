use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_instant, parse_instant, parse_uuid};
use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentItem};

pub fn insert_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointments (id, client_id, scheduled_at, total_amount, cancelled,
         notes, reminder_requested, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            appt.id.to_string(),
            appt.client_id.to_string(),
            format_instant(&appt.scheduled_at),
            appt.total_amount,
            appt.cancelled as i32,
            appt.notes,
            appt.reminder_requested as i32,
            format_instant(&appt.created_at),
            format_instant(&appt.updated_at),
        ],
    )?;
    Ok(())
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, DatabaseError> {
    let result = conn
        .prepare(
            "SELECT id, client_id, scheduled_at, total_amount, cancelled, notes,
             reminder_requested, created_at, updated_at
             FROM appointments WHERE id = ?1",
        )?
        .query_row(params![id.to_string()], appointment_from_row);

    match result {
        Ok(appt) => Ok(Some(appt)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Patches the mutable scalar fields and total, touching updated_at.
/// Line items are managed separately via `replace_line_items`.
pub fn update_appointment(conn: &Connection, appt: &Appointment) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments
         SET client_id = ?2, scheduled_at = ?3, total_amount = ?4, cancelled = ?5,
             notes = ?6, reminder_requested = ?7, updated_at = ?8
         WHERE id = ?1",
        params![
            appt.id.to_string(),
            appt.client_id.to_string(),
            format_instant(&appt.scheduled_at),
            appt.total_amount,
            appt.cancelled as i32,
            appt.notes,
            appt.reminder_requested as i32,
            format_instant(&Utc::now()),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appt.id.to_string(),
        });
    }
    Ok(())
}

/// Flips the cancelled flag. Idempotent at the data level: re-cancelling a
/// cancelled appointment is not an error.
pub fn set_cancelled(conn: &Connection, id: &Uuid, cancelled: bool) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE appointments SET cancelled = ?2, updated_at = ?3 WHERE id = ?1",
        params![
            id.to_string(),
            cancelled as i32,
            format_instant(&Utc::now()),
        ],
    )?;

    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn find_by_client(conn: &Connection, client_id: &Uuid) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, scheduled_at, total_amount, cancelled, notes,
         reminder_requested, created_at, updated_at
         FROM appointments
         WHERE client_id = ?1
         ORDER BY scheduled_at DESC",
    )?;

    let rows = stmt.query_map(params![client_id.to_string()], appointment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Appointments with `from <= scheduled_at < to`, ascending.
pub fn find_by_date_range(
    conn: &Connection,
    from: &DateTime<Utc>,
    to: &DateTime<Utc>,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, client_id, scheduled_at, total_amount, cancelled, notes,
         reminder_requested, created_at, updated_at
         FROM appointments
         WHERE scheduled_at >= ?1 AND scheduled_at < ?2
         ORDER BY scheduled_at ASC",
    )?;

    let rows = stmt.query_map(
        params![format_instant(from), format_instant(to)],
        appointment_from_row,
    )?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Number of non-cancelled appointments on a calendar day (daily-load
/// dashboard).
pub fn count_by_date(conn: &Connection, date: &NaiveDate) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM appointments WHERE date(scheduled_at) = ?1 AND cancelled = 0",
        params![date.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

// ─── Line items ───────────────────────────────────────────────────────────────

pub fn insert_appointment_item(conn: &Connection, item: &AppointmentItem) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO appointment_items (id, appointment_id, sub_service_id, price)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            item.id.to_string(),
            item.appointment_id.to_string(),
            item.sub_service_id.to_string(),
            item.price,
        ],
    )?;
    Ok(())
}

/// Wholesale replacement: delete every existing line item for the
/// appointment, then insert the new set. Callers run this inside the booking
/// transaction so the appointment total is updated in the same step.
pub fn replace_line_items(
    conn: &Connection,
    appointment_id: &Uuid,
    items: &[AppointmentItem],
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM appointment_items WHERE appointment_id = ?1",
        params![appointment_id.to_string()],
    )?;

    for item in items {
        insert_appointment_item(conn, item)?;
    }
    Ok(())
}

/// Line items joined with the sub-service name for display. The price always
/// comes from the item row (booking-time snapshot), never from the catalog.
pub fn get_appointment_items(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<AppointmentItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT ai.id, ai.appointment_id, ai.sub_service_id, ss.name, ai.price
         FROM appointment_items ai
         LEFT JOIN sub_services ss ON ai.sub_service_id = ss.id
         WHERE ai.appointment_id = ?1",
    )?;

    let rows = stmt.query_map(params![appointment_id.to_string()], |row| {
        Ok(AppointmentItem {
            id: parse_uuid(&row.get::<_, String>(0)?),
            appointment_id: parse_uuid(&row.get::<_, String>(1)?),
            sub_service_id: parse_uuid(&row.get::<_, String>(2)?),
            sub_service_name: row.get(3)?,
            price: row.get(4)?,
        })
    })?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

fn appointment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: parse_uuid(&row.get::<_, String>(0)?),
        client_id: parse_uuid(&row.get::<_, String>(1)?),
        scheduled_at: parse_instant(&row.get::<_, String>(2)?),
        total_amount: row.get(3)?,
        cancelled: row.get::<_, i32>(4)? != 0,
        notes: row.get(5)?,
        reminder_requested: row.get::<_, i32>(6)? != 0,
        created_at: parse_instant(&row.get::<_, String>(7)?),
        updated_at: parse_instant(&row.get::<_, String>(8)?),
    })
}
