//! Reminder IPC commands — scheduling plus the delivery integration's
//! reporting surface.

use chrono::Utc;
use tauri::State;

use super::{parse_id_arg, parse_instant_arg, ErrorPayload};
use crate::db::repository;
use crate::models::Reminder;
use crate::state::AppState;
use crate::{reminders, templates};

#[tauri::command]
pub fn list_client_reminders(
    state: State<'_, AppState>,
    client_id: String,
) -> Result<Vec<Reminder>, ErrorPayload> {
    let client_id = parse_id_arg(&client_id)?;
    let conn = state.open_db()?;
    Ok(repository::get_reminders_by_client(&conn, &client_id)?)
}

/// Pending reminders whose send time has passed — what the messaging
/// integration picks up on each sweep.
#[tauri::command]
pub fn list_due_reminders(state: State<'_, AppState>) -> Result<Vec<Reminder>, ErrorPayload> {
    let conn = state.open_db()?;
    Ok(reminders::due(&conn, &Utc::now())?)
}

/// Schedules a standalone reminder (not tied to an appointment). The message
/// body comes either from a template (rendered with the client's name and
/// the send time) or verbatim from `message`.
#[tauri::command]
pub fn create_reminder(
    state: State<'_, AppState>,
    client_id: String,
    send_at: String,
    message: Option<String>,
    template_id: Option<String>,
) -> Result<Reminder, ErrorPayload> {
    let client_id = parse_id_arg(&client_id)?;
    let send_at = parse_instant_arg(&send_at)?;

    let conn = state.open_db()?;
    let client = repository::get_client(&conn, &client_id)?
        .ok_or_else(|| ErrorPayload::not_found("client", &client_id.to_string()))?;

    let recipient = client
        .phone
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            ErrorPayload::business_rule(format!(
                "client {} has no contact channel",
                client.id
            ))
        })?;

    let body = match template_id {
        Some(raw) => {
            let template_id = parse_id_arg(&raw)?;
            let template = repository::get_template(&conn, &template_id)?
                .ok_or_else(|| ErrorPayload::not_found("message_template", &raw))?;
            Some(templates::render(&template.body, &client.display_name, &send_at))
        }
        None => message,
    };

    Ok(reminders::create_standalone(
        &conn, &client, &recipient, send_at, body,
    )?)
}

#[tauri::command]
pub fn mark_reminder_sent(
    state: State<'_, AppState>,
    id: String,
    response_payload: Option<String>,
) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    reminders::mark_sent(&conn, &id, response_payload.as_deref())?;
    Ok(())
}

#[tauri::command]
pub fn mark_reminder_failed(
    state: State<'_, AppState>,
    id: String,
    response_payload: Option<String>,
) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    reminders::mark_failed(&conn, &id, response_payload.as_deref())?;
    Ok(())
}
