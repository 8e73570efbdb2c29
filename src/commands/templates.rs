//! Message template IPC commands.

use chrono::Utc;
use tauri::State;
use uuid::Uuid;

use super::{parse_id_arg, parse_instant_arg, ErrorPayload};
use crate::db::repository;
use crate::models::MessageTemplate;
use crate::state::AppState;
use crate::templates;

fn validate_template(name: &str, body: &str) -> Result<(), ErrorPayload> {
    if name.trim().is_empty() {
        return Err(ErrorPayload::validation("Template name is required"));
    }
    if body.trim().is_empty() {
        return Err(ErrorPayload::validation("Template body is required"));
    }
    if body.len() > 2000 {
        return Err(ErrorPayload::validation("Template body too long (max 2000 chars)"));
    }
    Ok(())
}

#[tauri::command]
pub fn list_templates(state: State<'_, AppState>) -> Result<Vec<MessageTemplate>, ErrorPayload> {
    let conn = state.open_db()?;
    Ok(repository::get_all_templates(&conn)?)
}

#[tauri::command]
pub fn create_template(
    state: State<'_, AppState>,
    name: String,
    body: String,
) -> Result<MessageTemplate, ErrorPayload> {
    validate_template(&name, &body)?;

    let now = Utc::now();
    let template = MessageTemplate {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        body,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };

    let conn = state.open_db()?;
    repository::insert_template(&conn, &template)?;
    Ok(template)
}

#[tauri::command]
pub fn update_template(
    state: State<'_, AppState>,
    id: String,
    name: String,
    body: String,
) -> Result<MessageTemplate, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    validate_template(&name, &body)?;

    let conn = state.open_db()?;
    let mut template = repository::get_template(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("message_template", &id.to_string()))?;
    template.name = name.trim().to_string();
    template.body = body;

    repository::update_template(&conn, &template)?;
    Ok(template)
}

#[tauri::command]
pub fn delete_template(state: State<'_, AppState>, id: String) -> Result<(), ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let conn = state.open_db()?;
    repository::soft_delete_template(&conn, &id)?;
    Ok(())
}

/// Renders a template against a client name and appointment time, for the
/// preview pane in the template editor.
#[tauri::command]
pub fn preview_template(
    state: State<'_, AppState>,
    id: String,
    client_name: String,
    scheduled_at: String,
) -> Result<String, ErrorPayload> {
    let id = parse_id_arg(&id)?;
    let scheduled_at = parse_instant_arg(&scheduled_at)?;

    let conn = state.open_db()?;
    let template = repository::get_template(&conn, &id)?
        .ok_or_else(|| ErrorPayload::not_found("message_template", &id.to_string()))?;

    Ok(templates::render(&template.body, &client_name, &scheduled_at))
}
