//! Reminder scheduling — creates and maintains outbound message reminders.
//!
//! This module only decides *what* should be sent and *when*. Delivery is
//! the job of an external messaging integration: it polls [`due`] on each
//! sweep and reports outcomes back through [`mark_sent`] / [`mark_failed`],
//! which record the pending→sent / pending→failed transitions together with
//! the integration's opaque response payload.

use chrono::{DateTime, Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::{repository, DatabaseError};
use crate::models::enums::ReminderStatus;
use crate::models::{Appointment, Client, Reminder};

/// Schedules the booking-time reminder: addressed to the client's contact
/// channel, `lead_minutes` before the appointment, linked to it. Runs inside
/// the booking transaction, so it commits or rolls back with the rest of the
/// booking.
pub fn schedule_for_appointment(
    conn: &Connection,
    client: &Client,
    appointment: &Appointment,
    lead_minutes: i64,
) -> Result<Reminder, DatabaseError> {
    let recipient = client.phone.clone().ok_or_else(|| {
        DatabaseError::ConstraintViolation(format!(
            "client {} has no contact channel",
            client.id
        ))
    })?;

    let reminder = new_reminder(
        client.id,
        recipient,
        appointment.scheduled_at - Duration::minutes(lead_minutes),
        Some(appointment.id),
        None,
    );
    repository::insert_reminder(conn, &reminder)?;

    tracing::debug!(
        reminder_id = %reminder.id,
        appointment_id = %appointment.id,
        send_at = %reminder.send_at,
        "Reminder scheduled"
    );
    Ok(reminder)
}

/// Schedules a reminder that is not tied to any appointment (birthday
/// greetings, re-engagement messages). `message` is stored as the request
/// payload handed to the messaging integration.
pub fn create_standalone(
    conn: &Connection,
    client: &Client,
    recipient: &str,
    send_at: DateTime<Utc>,
    message: Option<String>,
) -> Result<Reminder, DatabaseError> {
    let reminder = new_reminder(client.id, recipient.to_string(), send_at, None, message);
    repository::insert_reminder(conn, &reminder)?;
    Ok(reminder)
}

/// Pending reminders whose send time has passed.
pub fn due(conn: &Connection, now: &DateTime<Utc>) -> Result<Vec<Reminder>, DatabaseError> {
    repository::list_due_reminders(conn, now)
}

/// Records a successful delivery reported by the messaging integration.
pub fn mark_sent(
    conn: &Connection,
    id: &Uuid,
    response_payload: Option<&str>,
) -> Result<(), DatabaseError> {
    repository::set_reminder_status(conn, id, ReminderStatus::Sent, response_payload)
}

/// Records a failed delivery attempt.
pub fn mark_failed(
    conn: &Connection,
    id: &Uuid,
    response_payload: Option<&str>,
) -> Result<(), DatabaseError> {
    repository::set_reminder_status(conn, id, ReminderStatus::Failed, response_payload)
}

fn new_reminder(
    client_id: Uuid,
    recipient: String,
    send_at: DateTime<Utc>,
    appointment_id: Option<Uuid>,
    request_payload: Option<String>,
) -> Reminder {
    let now = Utc::now();
    Reminder {
        id: Uuid::new_v4(),
        client_id,
        recipient,
        send_at,
        status: ReminderStatus::Pending,
        appointment_id,
        request_payload,
        response_payload: None,
        created_at: now,
        updated_at: now,
    }
}
